use std::path::Path;

use anyhow::{Context, Result};
use aura_mf::io::load_config;
use aura_mf::{SimulationConfig, SimulationRequest, Simulator};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_REQUESTS: usize = 30;

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only JSON.
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 3 {
        anyhow::bail!("usage: {} [config.json] [requests]", args[0]);
    }

    let config = match args.get(1) {
        Some(path) => load_config(Path::new(path))?,
        None => SimulationConfig::default(),
    };
    let requests = match args.get(2) {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("Invalid request count: {n}"))?,
        None => DEFAULT_REQUESTS,
    };

    info!(requests, grid = %config.grid_label(), "starting panel simulation");
    let simulator = Simulator::new(config)?;

    for _ in 0..requests {
        let response = simulator.simulate(&SimulationRequest::default())?;
        println!("{}", serde_json::to_string(&response)?);
    }

    println!("{}", serde_json::to_string(&simulator.health()?)?);
    Ok(())
}
