//! statusmux - merge custom command output into an i3bar status stream
//!
//! Sits between a status generator and the bar, adding one block per
//! configured command to every cycle of the i3bar JSON protocol.
//!
//! Exit codes:
//!   0 - Upstream input ended
//!   1 - Configuration, protocol or command failure

mod cli;
mod command;
mod config;
mod cycle;
mod error;
mod models;
mod protocol;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use cycle::Multiplexer;
use std::io::{self, BufWriter};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        print!("{}", Config::default_toml());
        return;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.general.log_level());

    info!("statusmux v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&config).await {
        error!("statusmux stopped: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize logging on stderr; stdout carries the protocol.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the config file if one was given and apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    config.merge_with_args(args);
    Ok(config)
}

/// Multiplex stdin to stdout until upstream closes.
async fn run(config: &Config) -> Result<()> {
    let specs = config.command_specs()?;
    for spec in specs.iter() {
        debug!(
            "Slot {}: {} {:?} (timeout {})",
            spec.slot,
            spec.program,
            spec.args,
            humantime::format_duration(spec.timeout)
        );
    }

    let input = io::stdin().lock();
    let output = BufWriter::new(io::stdout().lock());

    let cycles = Multiplexer::new(specs)
        .run(input, output)
        .await
        .context("Status stream aborted")?;

    debug!("Processed {} cycle(s)", cycles);
    Ok(())
}
