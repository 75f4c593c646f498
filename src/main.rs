use clap::Parser;
use log::{info, LevelFilter};

use std::io;

mod args;
mod booth;

use crate::booth::{read_config, run_booth, BoothConfig, BoothResult, Terminal};

fn run(args: &args::Args) -> BoothResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => BoothConfig::default(),
    };
    let config = config.with_overrides(args);
    info!("config: {:?}", config);

    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());
    let state = run_booth(config, &mut terminal)?;
    info!(
        "closing with {} candidates, {} voters",
        state.candidates.len(),
        state.voters.len()
    );
    Ok(())
}

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = run(&args) {
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
