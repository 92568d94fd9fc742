//! Error types.
//!
//! Timeouts and unstructured command output are not errors; everything
//! represented here is fatal to the process.

use std::process::ExitStatus;
use thiserror::Error;

/// Failure to run a custom command for reasons other than its deadline.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot run command {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot collect output of {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command {command} failed with {status}{}", stderr_suffix(.stderr))]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Framing or encoding failure on either side of the stream.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken { expected: &'static str, found: char },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
}

/// Anything that aborts the multiplexer loop.
#[derive(Debug, Error)]
pub enum MuxError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("command task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("slot {0} reported completion twice")]
    DuplicateSlot(usize),

    #[error("slot {0} is out of range")]
    UnknownSlot(usize),

    #[error("slot {0} never reported a block")]
    MissingSlot(usize),
}
