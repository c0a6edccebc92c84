//! The default formatter: re-indents block YAML without parsing it, so
//! comments, key order and scalar styles survive untouched.

mod features;
mod indent;

pub use features::{include_document_start, trim_trailing_whitespace};

use crate::config::{config_map, parse_config};
use crate::{Formatter, FormatterError, FormatterFactory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use yamlfmt_feature::FeatureList;

pub const BASIC_FORMATTER_TYPE: &str = "basic";

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BasicConfig {
    /// Columns per nesting level.
    pub indent: usize,

    /// Prefix output with `---` when it does not already start a document.
    pub include_document_start: bool,

    /// Keep single blank lines between nodes; runs collapse to one.
    /// Blank lines inside block and multi-line flow scalars are always kept.
    pub retain_line_breaks: bool,

    /// Strip trailing whitespace everywhere before formatting, block scalar
    /// bodies included.
    pub trim_trailing_whitespace: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            include_document_start: false,
            retain_line_breaks: true,
            trim_trailing_whitespace: false,
        }
    }
}

impl BasicConfig {
    pub fn validate(&self) -> Result<(), FormatterError> {
        if !(1..=16).contains(&self.indent) {
            return Err(FormatterError::InvalidConfig {
                type_tag: BASIC_FORMATTER_TYPE.to_string(),
                message: format!("indent must be between 1 and 16, got {}", self.indent),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasicFormatter {
    config: BasicConfig,
}

impl BasicFormatter {
    pub fn new(config: BasicConfig) -> Result<Self, FormatterError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BasicConfig {
        &self.config
    }
}

impl Formatter for BasicFormatter {
    fn type_tag(&self) -> &'static str {
        BASIC_FORMATTER_TYPE
    }

    fn format(&self, input: &[u8]) -> anyhow::Result<Vec<u8>> {
        let text = std::str::from_utf8(input).map_err(FormatterError::from)?;
        let (bom, text) = match text.strip_prefix(UTF8_BOM) {
            Some(rest) => (UTF8_BOM, rest),
            None => ("", text),
        };

        let body = indent::reindent(text, &self.config);
        debug!(bytes_in = input.len(), bytes_out = body.len(), "basic format");
        if body.is_empty() {
            return Ok(Vec::new());
        }
        Ok(format!("{bom}{body}").into_bytes())
    }

    fn config_map(&self) -> anyhow::Result<Map<String, Value>> {
        config_map(BASIC_FORMATTER_TYPE, &self.config)
    }

    fn features(&self) -> FeatureList {
        let mut features = FeatureList::new();
        if self.config.trim_trailing_whitespace {
            features.push(trim_trailing_whitespace());
        }
        if self.config.include_document_start {
            features.push(include_document_start());
        }
        features
    }
}

pub struct BasicFormatterFactory;

impl FormatterFactory for BasicFormatterFactory {
    fn type_tag(&self) -> &'static str {
        BASIC_FORMATTER_TYPE
    }

    fn new_formatter(&self, config: &Map<String, Value>) -> anyhow::Result<Box<dyn Formatter>> {
        let config: BasicConfig = parse_config(BASIC_FORMATTER_TYPE, config)?;
        Ok(Box::new(BasicFormatter::new(config)?))
    }
}
