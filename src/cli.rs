//! CLI argument parsing for the zasilka-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zasilka-worker", about = "Zasilka route sequencing worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Sequence a route snapshot from a JSON file and print the schedule
    Sequence {
        /// Path to a JSON file with a route ({"stops": [...]})
        #[arg(long)]
        file: String,
        /// Departure time, HH:MM (default 09:00)
        #[arg(long)]
        start: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["zasilka-worker"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_serve_command_parses() {
        let cli = Cli::parse_from(["zasilka-worker", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_cli_sequence_command_parses() {
        let cli = Cli::parse_from([
            "zasilka-worker",
            "sequence",
            "--file",
            "route.json",
            "--start",
            "08:30",
        ]);
        match cli.command {
            Some(Command::Sequence { file, start }) => {
                assert_eq!(file, "route.json");
                assert_eq!(start.as_deref(), Some("08:30"));
            }
            _ => panic!("expected sequence command"),
        }
    }
}
