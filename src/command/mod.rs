//! Custom commands whose output is merged into every cycle.
//!
//! A [`CommandSpec`] is built once at startup and shared by every cycle;
//! [`runner::run`] executes it and produces exactly one block.

pub mod runner;

pub use runner::run;

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

/// One external command, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Hard deadline measured from launch.
    pub timeout: Duration,
    /// Output position among the custom blocks.
    pub slot: usize,
}

impl CommandSpec {
    /// Build a spec from a command line.
    ///
    /// The line is split on whitespace, so arguments containing spaces
    /// cannot be expressed. A blank line is rejected.
    pub fn parse(line: &str, timeout: Duration, slot: usize) -> Result<Self> {
        let mut words = line.split_whitespace().map(String::from);

        let Some(program) = words.next() else {
            bail!("Command {} is empty", slot + 1);
        };

        Ok(Self {
            program,
            args: words.collect(),
            timeout,
            slot,
        })
    }
}

/// Parse all command lines into specs, assigning slots in order.
pub fn parse_all<S: AsRef<str>>(lines: &[S], timeout: Duration) -> Result<Arc<[CommandSpec]>> {
    lines
        .iter()
        .enumerate()
        .map(|(slot, line)| CommandSpec::parse(line.as_ref(), timeout, slot))
        .collect()
}
