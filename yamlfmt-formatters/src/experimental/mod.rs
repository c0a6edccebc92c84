//! Parse and re-emit round trip through `serde_yaml`.
//!
//! Output is fully normalized (two-space indentation, canonical quoting) but
//! comments are lost, apart from a leading comment block which the
//! `retain_header_comments` feature carries around the backend.

mod header;

pub use header::{HEADER_COMMENTS_KEY, retain_header_comments};

use crate::config::{config_map, parse_config};
use crate::{Formatter, FormatterError, FormatterFactory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use yamlfmt_feature::FeatureList;

pub const EXPERIMENTAL_FORMATTER_TYPE: &str = "experimental";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentalConfig {
    pub retain_header_comments: bool,
}

impl Default for ExperimentalConfig {
    fn default() -> Self {
        Self {
            retain_header_comments: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperimentalFormatter {
    config: ExperimentalConfig,
}

impl ExperimentalFormatter {
    pub fn new(config: ExperimentalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExperimentalConfig {
        &self.config
    }
}

impl Formatter for ExperimentalFormatter {
    fn type_tag(&self) -> &'static str {
        EXPERIMENTAL_FORMATTER_TYPE
    }

    fn format(&self, input: &[u8]) -> anyhow::Result<Vec<u8>> {
        let text = std::str::from_utf8(input).map_err(FormatterError::from)?;
        if text
            .lines()
            .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'))
        {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = serde_yaml::Value::deserialize(document).map_err(FormatterError::from)?;
            documents.push(serde_yaml::to_string(&value).map_err(FormatterError::from)?);
        }
        debug!(documents = documents.len(), "experimental format");
        Ok(documents.join("---\n").into_bytes())
    }

    fn config_map(&self) -> anyhow::Result<Map<String, Value>> {
        config_map(EXPERIMENTAL_FORMATTER_TYPE, &self.config)
    }

    fn features(&self) -> FeatureList {
        let mut features = FeatureList::new();
        if self.config.retain_header_comments {
            features.push(retain_header_comments());
        }
        features
    }
}

pub struct ExperimentalFormatterFactory;

impl FormatterFactory for ExperimentalFormatterFactory {
    fn type_tag(&self) -> &'static str {
        EXPERIMENTAL_FORMATTER_TYPE
    }

    fn new_formatter(&self, config: &Map<String, Value>) -> anyhow::Result<Box<dyn Formatter>> {
        let config: ExperimentalConfig = parse_config(EXPERIMENTAL_FORMATTER_TYPE, config)?;
        Ok(Box::new(ExperimentalFormatter::new(config)))
    }
}
