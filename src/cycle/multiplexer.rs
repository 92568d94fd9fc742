//! The main loop: decode a cycle, run the commands, encode the merge.

use crate::command::CommandSpec;
use crate::cycle::run_cycle;
use crate::error::MuxError;
use crate::protocol::{StreamReader, StreamWriter};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::block_in_place;
use tracing::{debug, info};

/// Drives cycles from an upstream reader to a downstream writer.
pub struct Multiplexer {
    specs: Arc<[CommandSpec]>,
}

impl Multiplexer {
    /// Create a multiplexer for a fixed set of commands.
    pub fn new(specs: Arc<[CommandSpec]>) -> Self {
        Self { specs }
    }

    /// Run until the upstream stream ends, returning the number of cycles.
    ///
    /// Upstream reads block, so they are moved off the async scheduler with
    /// `block_in_place`; this requires the multi-threaded runtime.
    pub async fn run<R, W>(&self, input: R, output: W) -> Result<u64, MuxError>
    where
        R: BufRead,
        W: Write,
    {
        let mut reader = StreamReader::new(input);
        let mut writer = StreamWriter::new(output);

        let header = block_in_place(|| reader.read_header())?;
        writer.write_header(&header)?;

        block_in_place(|| reader.open_array())?;
        writer.open_array()?;

        info!(
            "Merging {} custom command(s) into protocol version {}",
            self.specs.len(),
            header.version
        );

        while let Some(upstream) = block_in_place(|| reader.next_cycle())? {
            let started = Instant::now();
            let upstream_count = upstream.len();

            let combined = run_cycle(&self.specs, upstream).await?;
            writer.write_cycle(&combined)?;

            debug!(
                "Cycle {} merged {} + {} blocks in {:?}",
                reader.cycles(),
                self.specs.len(),
                upstream_count,
                started.elapsed()
            );
        }

        info!("Upstream closed after {} cycle(s)", reader.cycles());
        Ok(reader.cycles())
    }
}
