//! Clap-free settings for the engine.

use serde::{Deserialize, Serialize};
use yamlfmt_diff::LineEnding;

/// Engine behaviour shared by every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Line ending for formatted output. `None` keeps each file's own.
    pub line_ending: Option<LineEnding>,

    /// Render only changed paths instead of full diffs.
    pub quiet: bool,
}

impl EngineSettings {
    /// Ending used for `content`: the configured one, else the detected one.
    pub fn line_ending_for(&self, content: &[u8]) -> LineEnding {
        self.line_ending.unwrap_or_else(|| LineEnding::detect(content))
    }
}
