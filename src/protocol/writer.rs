//! Encoding of the downstream i3bar stream.
//!
//! Output mirrors the input framing: header line, `[` line, then one
//! compact array per cycle followed by a `,`. The array is never closed.
//! Every write is flushed so the bar redraws immediately.

use crate::error::ProtocolError;
use crate::models::{CycleBlock, Header};
use std::io::Write;

/// Writer for the downstream protocol stream.
pub struct StreamWriter<W> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write the header on its own line.
    pub fn write_header(&mut self, header: &Header) -> Result<(), ProtocolError> {
        serde_json::to_writer(&mut self.inner, header)?;
        self.inner.write_all(b"\n")?;
        self.flush()
    }

    /// Open the endless array.
    pub fn open_array(&mut self) -> Result<(), ProtocolError> {
        self.inner.write_all(b"[\n")?;
        self.flush()
    }

    /// Write one cycle and the separator announcing the next one.
    pub fn write_cycle(&mut self, blocks: &[CycleBlock]) -> Result<(), ProtocolError> {
        serde_json::to_writer(&mut self.inner, blocks)?;
        self.inner.write_all(b"\n,")?;
        self.flush()
    }

    /// Recover the underlying writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush(&mut self) -> Result<(), ProtocolError> {
        self.inner.flush()?;
        Ok(())
    }
}
