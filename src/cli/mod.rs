//! CLI 模块

pub mod bar;
pub mod check;
pub mod config;
pub mod status;
pub mod toggle;
pub mod watch;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "themetoggle")]
#[command(version)]
#[command(about = "Toggle the macOS light/dark appearance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the status bar (default)
    Bar,
    /// Switch between Dark and Light once and exit
    Toggle,
    /// Print the current appearance ("D" or "L")
    Status {
        /// Print "Dark"/"Light" instead of the single-letter label
        #[arg(long)]
        long: bool,
    },
    /// Follow appearance changes; reads "toggle", "refresh" or "quit" from stdin
    Watch,
    /// Check that defaults/osascript are usable
    Check,
    /// Show the config file path and effective settings
    Config {
        /// Write the default config if none exists
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["themetoggle"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["themetoggle", "status", "--long"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Status { long: true }));

        let cli = Cli::try_parse_from(["themetoggle", "config", "--init"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Config { init: true }));

        assert!(Cli::try_parse_from(["themetoggle", "auto"]).is_err());
    }
}
