mod application;
mod cli;
mod cli_handlers;
mod core;
mod logging;
mod modules;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _guard = logging::init();

    cli_handlers::from_cli(cli.command).execute()
}
