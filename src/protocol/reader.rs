//! Decoding of the upstream i3bar stream.
//!
//! The stream is a header object, a `[` that opens an endless array, and
//! then one array of blocks per cycle separated by commas. Values are
//! decoded one at a time straight off the buffered reader.

use crate::error::ProtocolError;
use crate::models::{Header, UpstreamBlock};
use serde::de::DeserializeOwned;
use std::io::BufRead;
use tracing::{debug, trace};

/// Incremental reader over the upstream protocol stream.
pub struct StreamReader<R> {
    inner: R,
    cycles: u64,
}

impl<R: BufRead> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, cycles: 0 }
    }

    /// Read the header object.
    pub fn read_header(&mut self) -> Result<Header, ProtocolError> {
        self.expect_byte(b'{', "header object")?;
        let header: Header = self.decode()?;
        debug!("Upstream protocol version {}", header.version);
        Ok(header)
    }

    /// Consume the `[` that opens the endless array.
    pub fn open_array(&mut self) -> Result<(), ProtocolError> {
        self.expect_byte(b'[', "'['")?;
        self.inner.consume(1);
        Ok(())
    }

    /// Read the blocks of the next cycle.
    ///
    /// Each block is kept as its raw JSON object. Returns `Ok(None)` when
    /// the input ends or the array is closed.
    pub fn next_cycle(&mut self) -> Result<Option<Vec<UpstreamBlock>>, ProtocolError> {
        match self.peek_byte()? {
            None | Some(b']') => return Ok(None),
            Some(b',') => self.inner.consume(1),
            Some(_) => {}
        }

        // A separator must still be followed by an element
        match self.peek_byte()? {
            Some(b'[') => {}
            Some(other) => {
                return Err(ProtocolError::UnexpectedToken {
                    expected: "array of blocks",
                    found: other as char,
                })
            }
            None => {
                return Err(ProtocolError::UnexpectedEof {
                    expected: "array of blocks",
                })
            }
        }

        let blocks: Vec<UpstreamBlock> = self.decode()?;
        self.cycles += 1;
        trace!("Cycle {}: {} upstream blocks", self.cycles, blocks.len());
        Ok(Some(blocks))
    }

    /// Number of cycles read so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Decode one self-delimiting JSON value at the current position.
    ///
    /// Objects and arrays end on their closing bracket, so no byte past the
    /// value is consumed and the next separator stays in the buffer.
    fn decode<T: DeserializeOwned>(&mut self) -> Result<T, ProtocolError> {
        let mut de = serde_json::Deserializer::from_reader(&mut self.inner);
        let value: T = serde::Deserialize::deserialize(&mut de)?;
        Ok(value)
    }

    /// Skip whitespace and return the next byte without consuming it.
    fn peek_byte(&mut self) -> Result<Option<u8>, ProtocolError> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                return Ok(None);
            }

            let skip = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            if skip < buf.len() {
                let next = buf[skip];
                self.inner.consume(skip);
                return Ok(Some(next));
            }
            let len = buf.len();
            self.inner.consume(len);
        }
    }

    fn expect_byte(&mut self, wanted: u8, expected: &'static str) -> Result<(), ProtocolError> {
        match self.peek_byte()? {
            Some(b) if b == wanted => Ok(()),
            Some(b) => Err(ProtocolError::UnexpectedToken {
                expected,
                found: b as char,
            }),
            None => Err(ProtocolError::UnexpectedEof { expected }),
        }
    }
}
