use anyhow::Result;
use clap::Parser;

use probex::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(cmd) => cmd.execute(),
        Commands::Wait(cmd) => cmd.execute(),
        Commands::Check(cmd) => cmd.execute(),
        Commands::Config(cmd) => cmd.execute(),
        Commands::Completions(cmd) => cmd.execute(),
    }
}
