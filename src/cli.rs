//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// statusmux - merge custom commands into an i3bar status stream
///
/// Reads the i3bar JSON protocol on stdin (e.g. from i3status), runs the
/// given commands every cycle and prepends their output as blocks before
/// writing the stream to stdout.
///
/// A command that prints a JSON block is used as-is; any other output
/// becomes the block's text. Commands are split on whitespace.
///
/// Examples:
///   i3status | statusmux "date +%H:%M"
///   i3status | statusmux --timeout 500ms "acpi -b" "~/bin/weather"
///   i3status | statusmux --config ~/.config/statusmux.toml
///   statusmux --init-config > ~/.config/statusmux.toml
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Commands to run every cycle, in display order
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Timeout for each command (e.g. 5s, 750ms)
    ///
    /// A command still running after this long is killed and shown as
    /// "Timed out". Default: from config or 5s.
    #[arg(
        short,
        long,
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        env = "STATUSMUX_TIMEOUT"
    )]
    pub timeout: Option<Duration>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", env = "STATUSMUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output (on stderr)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print a default configuration file to stdout and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be greater than zero".to_string());
            }
        }

        if let Some(ref config) = self.config {
            if !config.is_file() {
                return Err(format!("Config file does not exist: {}", config.display()));
            }
        }

        Ok(())
    }
}
