//! Configuration file handling.
//!
//! This module handles loading an optional TOML file and merging it
//! with command-line arguments. The result is read once at startup and
//! never changes afterwards.

use crate::command::{self, CommandSpec};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Custom command settings.
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable debug logging.
    #[serde(default)]
    pub verbose: bool,

    /// Only log errors.
    #[serde(default)]
    pub quiet: bool,
}

impl GeneralConfig {
    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Custom commands and their shared timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Timeout applied to every command, e.g. "5s" or "750ms".
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Command lines, in display order. Split on whitespace.
    #[serde(default)]
    pub run: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            run: Vec::new(),
        }
    }
}

fn default_timeout() -> String {
    "5s".to_string()
}

impl CommandsConfig {
    /// Parse the configured timeout.
    pub fn timeout(&self) -> Result<Duration> {
        let timeout = humantime::parse_duration(&self.timeout)
            .with_context(|| format!("Invalid timeout: {}", self.timeout))?;

        if timeout.is_zero() {
            bail!("Timeout must be greater than zero");
        }

        Ok(timeout)
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(timeout) = args.timeout {
            self.commands.timeout = humantime::format_duration(timeout).to_string();
        }

        // Positional commands replace the file's list rather than extend it
        if !args.commands.is_empty() {
            self.commands.run = args.commands.clone();
        }

        if args.verbose {
            self.general.verbose = true;
            self.general.quiet = false;
        }
        if args.quiet {
            self.general.quiet = true;
            self.general.verbose = false;
        }
    }

    /// Build the immutable command list shared by every cycle.
    pub fn command_specs(&self) -> Result<Arc<[CommandSpec]>> {
        let timeout = self.commands.timeout()?;
        command::parse_all(self.commands.run.as_slice(), timeout)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.commands.run = vec!["date +%H:%M".to_string()];
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.commands.timeout().unwrap(), Duration::from_secs(5));
        assert!(config.commands.run.is_empty());
        assert_eq!(config.general.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[commands]
timeout = "750ms"
run = ["date +%H:%M", "acpi -b"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.commands.timeout().unwrap(), Duration::from_millis(750));

        let specs = config.command_specs().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].program, "acpi");
        assert_eq!(specs[1].args, vec!["-b"]);
        assert_eq!(specs[1].timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_invalid_timeouts() {
        let mut config = Config::default();
        config.commands.timeout = "soon".to_string();
        assert!(config.commands.timeout().is_err());

        config.commands.timeout = "0s".to_string();
        assert!(config.commands.timeout().is_err());
    }

    #[test]
    fn test_blank_command_rejected() {
        let mut config = Config::default();
        config.commands.run = vec!["date".to_string(), "  ".to_string()];
        assert!(config.command_specs().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[commands]\nrun = [\"uptime\"]").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.commands.run, vec!["uptime"]);
        assert_eq!(config.commands.timeout, "5s");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/statusmux.toml")).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config: Config = toml::from_str(
            r#"
[commands]
timeout = "10s"
run = ["uptime"]
"#,
        )
        .unwrap();

        let args = Args::parse_from(["statusmux", "--timeout", "2s", "echo hi", "date"]);
        config.merge_with_args(&args);

        let specs = config.command_specs().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].program, "echo");
        assert_eq!(specs[0].timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_file_kept_without_cli_values() {
        let mut config: Config = toml::from_str(
            r#"
[commands]
timeout = "10s"
run = ["uptime"]
"#,
        )
        .unwrap();

        let args = Args::parse_from(["statusmux", "--quiet"]);
        config.merge_with_args(&args);

        assert_eq!(config.commands.run, vec!["uptime"]);
        assert_eq!(config.commands.timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.general.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[commands]"));

        let config: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.command_specs().unwrap().len(), 1);
    }
}
