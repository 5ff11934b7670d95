pub mod equations;
pub mod solver;
pub mod trajectory;
pub mod scenario;
