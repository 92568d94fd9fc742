//! i3bar protocol framing.
//!
//! Reader and writer for the header + endless array stream.

pub mod reader;
pub mod writer;

pub use reader::StreamReader;
pub use writer::StreamWriter;
