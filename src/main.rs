use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use tidysweep::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    Cli::parse().command.run()
}
