mod settings;
mod timer;

pub use settings::{CadenceCommand, HornCommand, VolumeCommand};
pub use timer::{StartCommand, TuiCommand};

use crate::cli::Commands;
use anyhow::Result;

/// Every CLI command implements this trait.
///
/// Commands own their arguments and are consumed on execution, so each runs exactly once.
pub trait CliCommand {
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Converts a parsed [`Commands`] variant into a boxed [`CliCommand`] ready to execute.
pub fn from_cli(cmd: Commands) -> Box<dyn CliCommand> {
    match cmd {
        Commands::Tui { timer } => Box::new(TuiCommand { args: timer }),
        Commands::Start { timer } => Box::new(StartCommand { args: timer }),
        Commands::Volume { volume } => Box::new(VolumeCommand { volume }),
        Commands::Cadence { cadence } => Box::new(CadenceCommand { cadence }),
        Commands::Horn { path, clear } => Box::new(HornCommand { path, clear }),
    }
}
