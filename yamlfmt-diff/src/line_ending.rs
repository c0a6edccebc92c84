use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Line terminator used when rendering diffs and writing formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Detect the separator from the first line terminator in `content`.
    ///
    /// Content without any terminator is treated as LF.
    pub fn detect(content: &[u8]) -> Self {
        match content.iter().position(|&b| b == b'\n') {
            Some(pos) if pos > 0 && content[pos - 1] == b'\r' => LineEnding::Crlf,
            _ => LineEnding::Lf,
        }
    }

    /// Rewrite every line break in `content` to this ending.
    ///
    /// Lone `\r` bytes that are not part of a CRLF pair are left alone.
    pub fn apply(self, content: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(content.len());
        let mut i = 0;
        while i < content.len() {
            match content[i] {
                b'\r' if content.get(i + 1) == Some(&b'\n') => {
                    out.extend_from_slice(self.as_str().as_bytes());
                    i += 2;
                }
                b'\n' => {
                    out.extend_from_slice(self.as_str().as_bytes());
                    i += 1;
                }
                b => {
                    out.push(b);
                    i += 1;
                }
            }
        }
        out
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => f.write_str("lf"),
            LineEnding::Crlf => f.write_str("crlf"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(LineEnding::Lf),
            "crlf" => Ok(LineEnding::Crlf),
            other => Err(format!("unknown line ending '{}': expected lf or crlf", other)),
        }
    }
}
