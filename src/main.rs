use chaosim::{ScenarioConfig, NBodyScenario, PendulumScenario};
use chaosim::{derive_equations_of_motion, run_nbody, write_gif, PendulumAnimation, RenderLoop};
use chaosim::{bench_forces, bench_steps, bench_pendulum_solver};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "nbody.yaml")]
    file_name: String,

    /// Run the timing benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn setup_logging(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .context("failed to install logger")
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn run_pendulums(scenario: PendulumScenario) -> Result<()> {
    let eom = derive_equations_of_motion();
    let trajectories = scenario.simulate(&eom)?;

    let render = &scenario.render;
    let animation = PendulumAnimation::new(&trajectories, &scenario.pendulums, render.margin, render.trail);
    let frames = write_gif(&render.output, RenderLoop::new(animation), render.size, render.interval_ms)?;
    info!("wrote {} frames", frames);

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level)?;

    if args.bench {
        bench_forces();
        bench_steps();
        bench_pendulum_solver();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    match scenario_cfg {
        ScenarioConfig::NBody(cfg) => {
            let scenario = NBodyScenario::build_scenario(cfg)?;
            run_nbody(scenario);
        }
        ScenarioConfig::Pendulum(cfg) => {
            let scenario = PendulumScenario::build_scenario(cfg)?;
            run_pendulums(scenario)?;
        }
    }

    Ok(())
}
