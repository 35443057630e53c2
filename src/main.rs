use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use ljmd::{ContextOptions, Runner, ScriptConfig};

#[derive(Parser, Debug)]
#[command(name = "ljmd")]
#[command(about = "Lennard-Jones molecular dynamics on a lattice with a Langevin thermostat")]
struct Args {
    /// JSON run description, the built-in script when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the log and trajectory files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Override the number of time steps
    #[arg(long)]
    steps: Option<usize>,

    /// Override the thermostat seed
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for force evaluation
    #[arg(long)]
    threads: Option<usize>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    let level = ContextOptions::default().log_level(args.verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> ljmd::Result<()> {
    let mut config = match &args.config {
        Some(path) => ScriptConfig::from_file(path)?,
        None => ScriptConfig::default(),
    };
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.integrator.seed = seed;
    }
    if args.threads.is_some() {
        config.context.num_threads = args.threads;
    }

    let summary = Runner::new(config).with_output_dir(args.output_dir).run()?;
    info!(
        "finished {} steps on {} particles (step {})",
        summary.steps, summary.num_particles, summary.final_step
    );
    Ok(())
}
