//! Writer configuration.

use serde::{Deserialize, Serialize};

/// Options for [`crate::StepEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Pass string content through the string encoder (data section) instead
    /// of wrapping it in plain single quotes (header).
    pub encode_strings: bool,
    /// Maximum nesting of inline simple-type instances.
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            encode_strings: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    pub fn encoded() -> Self {
        Self {
            encode_strings: true,
            ..Self::default()
        }
    }
}
