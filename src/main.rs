use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use myrmica_lib::{AppConfig, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about = "Colony foraging simulation", long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 500)]
    ticks: u64,

    /// RNG seed for world generation
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Agents per colony
    #[arg(short, long, default_value_t = 8)]
    agents: usize,
}

fn main() -> Result<()> {
    myrmica_core::init_logging();
    let args = Args::parse();

    let config = AppConfig::load(&args.config)?;
    let mut sim = Simulation::new(config.world, &config.core, args.agents, args.seed)?;
    let summary = sim.run(args.ticks);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
