//! Data models for the i3bar protocol.
//!
//! This module contains the status block and header types that flow
//! through every cycle. Command output is decoded into typed blocks while
//! upstream blocks stay raw JSON objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name given to blocks synthesized from plain-text command output.
pub const CUSTOM_BLOCK_NAME: &str = "customCmd";

/// Full text of the block emitted when a command exceeds its timeout.
pub const TIMED_OUT_TEXT: &str = "Timed out";

/// Text alignment inside a block when `min_width` is larger than the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Minimum width of a block.
///
/// i3bar accepts either a pixel count or a string whose rendered width is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinWidth {
    Pixels(u32),
    Text(String),
}

/// A single status block in the i3bar protocol.
///
/// Every field is optional and absent fields are omitted when serialized.
/// Used for blocks produced by custom commands. Keys that are not part of
/// the protocol (i3bar reserves `_`-prefixed keys for users) are kept in
/// `extra` and re-emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_top: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_right: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_left: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<MinWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator_block_width: Option<u32>,
    /// Keys outside the protocol, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    /// Block reported for a command that ran past its deadline.
    pub fn timed_out() -> Self {
        Self {
            full_text: Some(TIMED_OUT_TEXT.to_string()),
            ..Self::default()
        }
    }

    /// Block wrapping plain-text output of a custom command.
    pub fn custom(instance: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            name: Some(CUSTOM_BLOCK_NAME.to_string()),
            instance: Some(instance.into()),
            full_text: Some(full_text.into()),
            ..Self::default()
        }
    }

    /// Try to interpret command output as a structured block.
    ///
    /// Only a JSON object is accepted; scalars, arrays and malformed
    /// input return `None` so the caller can fall back to plain text.
    pub fn from_json(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// A block from the status source, kept as the raw JSON object.
///
/// Upstream blocks are never interpreted, so any value the source emits
/// (floats, nulls, future protocol keys) is re-emitted unchanged.
pub type UpstreamBlock = Map<String, Value>;

/// One element of a merged cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CycleBlock {
    /// Produced by a custom command.
    Custom(Block),
    /// Passed through from the status source.
    Upstream(UpstreamBlock),
}

impl CycleBlock {
    /// The block's `full_text`, whichever side it came from.
    pub fn full_text(&self) -> Option<&str> {
        match self {
            CycleBlock::Custom(block) => block.full_text.as_deref(),
            CycleBlock::Upstream(raw) => raw.get("full_text").and_then(Value::as_str),
        }
    }
}

/// Protocol header, the first object on the stream.
///
/// Only `version` is required. Anything else the status source announces
/// (`click_events`, `stop_signal`, ...) is carried through in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub version: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    #[cfg(test)]
    pub fn new(version: u64) -> Self {
        Self {
            version,
            extra: Map::new(),
        }
    }
}
