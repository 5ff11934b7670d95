//! Error type shared by both pipelines

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("parameter `{name}` must be positive and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("time grid is empty")]
    EmptyGrid,

    #[error("time grid must be strictly increasing (sample {index})")]
    UnorderedGrid { index: usize },

    #[error("derivative is not finite at t = {t}")]
    NonFinite { t: f64 },

    #[error("exceeded {steps} steps before reaching t = {t}")]
    StepLimit { t: f64, steps: usize },

    #[error("integration failed after t = {t}: {reason}")]
    Integration { t: f64, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, SimError>;
