use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gridchase::config::Config;
use gridchase::layout;
use gridchase::StepTrace;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run a pursuit/evasion simulation on an obstacle grid
#[derive(Debug, Parser)]
#[command(name = "gridchase", version)]
struct Args {
    /// TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Text layout file, overriding the configured grid
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Number of steps to run
    #[arg(long)]
    steps: Option<usize>,
    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Print the step trace as JSON instead of the final grid
    #[arg(long)]
    json: bool,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config);
    init_tracing(&config.logging.filter);

    if let Some(path) = args.layout {
        config.grid.layout = Some(path);
    }
    if let Some(steps) = args.steps {
        config.simulation.steps = steps;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    let mut sim = config
        .build_simulation()
        .context("failed to build simulation")?;
    info!(
        rows = sim.grid().rows(),
        cols = sim.grid().cols(),
        pursuers = sim.num_pursuers(),
        evaders = sim.num_evaders(),
        seed = sim.seed(),
        steps = config.simulation.steps,
        "starting simulation"
    );

    let mut trace = StepTrace::new(sim.seed());
    for report in sim.run(config.simulation.steps)? {
        trace.push(report);
    }
    info!("{}", trace.summary());

    if args.json {
        println!("{}", trace.to_json()?);
    } else {
        print!("{}", layout::render(&sim));
        println!("{}", trace.summary());
    }

    Ok(())
}

