//! Execution of a single custom command under a deadline.
//!
//! The command's stdout becomes one status block: structured if the
//! output is a JSON block, wrapped as plain text otherwise.

use crate::command::CommandSpec;
use crate::error::CommandError;
use crate::models::Block;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Run one command and turn its output into a block.
///
/// Exceeding the deadline is not an error: the child is killed and a
/// "Timed out" block is returned. Launch failures and non-zero exits are.
pub async fn run(spec: &CommandSpec) -> Result<Block, CommandError> {
    debug!("Launching slot {}: {} {:?}", spec.slot, spec.program, spec.args);
    let started = Instant::now();

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CommandError::Spawn {
            command: spec.program.clone(),
            source,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Pipes are drained alongside wait() so a chatty child cannot block on a full pipe
    let finished = timeout(spec.timeout, async {
        tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
    })
    .await;

    let (status, stdout, stderr) = match finished {
        Ok(result) => result.map_err(|source| CommandError::Wait {
            command: spec.program.clone(),
            source,
        })?,
        Err(_) => {
            warn!(
                "{} timed out after {}",
                spec.program,
                humantime::format_duration(spec.timeout)
            );
            // kill() also reaps the child
            if let Err(e) = child.kill().await {
                debug!("Failed to kill {}: {}", spec.program, e);
            }
            return Ok(Block::timed_out());
        }
    };

    debug!(
        "{} finished in {:?} with {}",
        spec.program,
        started.elapsed(),
        status
    );

    if !status.success() {
        return Err(CommandError::Failed {
            command: spec.program.clone(),
            status,
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    Ok(output_to_block(&spec.program, &stdout))
}

/// Normalize raw stdout into a block.
pub fn output_to_block(program: &str, stdout: &[u8]) -> Block {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();

    match Block::from_json(trimmed) {
        Some(block) => block,
        None => Block::custom(program, trimmed),
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
