use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::models::TickCadence;
use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Countdown timer with a tower skyline reveal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the interactive and plain countdowns
#[derive(Args, Debug, Clone, Default)]
pub struct TimerArgs {
    /// Minutes (0-99), defaults to the last duration used
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=99))]
    pub minutes: Option<u32>,

    /// Seconds (0-59), defaults to the last duration used
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=59))]
    pub seconds: Option<u32>,

    /// Update cadence, overrides the saved setting
    #[arg(long, value_enum)]
    pub cadence: Option<TickCadence>,

    /// Play no sounds
    #[arg(long)]
    pub mute: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the full-screen timer
    Tui {
        #[command(flatten)]
        timer: TimerArgs,
    },

    /// Count down on a single line and exit when done
    Start {
        #[command(flatten)]
        timer: TimerArgs,
    },

    /// Show or set the sound volume (0-100)
    Volume {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        volume: Option<u8>,
    },

    /// Show or set the default update cadence
    Cadence {
        #[arg(value_enum)]
        cadence: Option<TickCadence>,
    },

    /// Show or set the completion sound file
    Horn {
        /// Audio file played when the countdown finishes
        path: Option<PathBuf>,

        /// Go back to the built-in horn
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timer_flags() {
        let cli = Cli::try_parse_from([APP_NAME, "start", "-m", "2", "-s", "30", "--cadence", "second", "--mute"])
            .unwrap();

        let Commands::Start { timer } = cli.command else {
            panic!("expected start");
        };
        assert_eq!(timer.minutes, Some(2));
        assert_eq!(timer.seconds, Some(30));
        assert_eq!(timer.cadence, Some(TickCadence::Second));
        assert!(timer.mute);
    }

    #[test]
    fn rejects_out_of_range_seconds() {
        assert!(Cli::try_parse_from([APP_NAME, "tui", "-s", "60"]).is_err());
        assert!(Cli::try_parse_from([APP_NAME, "volume", "101"]).is_err());
    }

    #[test]
    fn horn_clear_conflicts_with_a_path() {
        assert!(Cli::try_parse_from([APP_NAME, "horn", "a.wav", "--clear"]).is_err());
        assert!(Cli::try_parse_from([APP_NAME, "horn", "--clear"]).is_ok());
    }
}
