//! Formatter backends for yamlfmt.
//!
//! A [`Formatter`] turns raw YAML bytes into normalized bytes and describes
//! its configuration as a plain map. Backends are created by a
//! [`FormatterFactory`] registered under a type tag; [`FormatterRegistry`]
//! resolves a tag plus config map into a ready formatter.
//!
//! Built-in backends:
//! - [`basic`]: structural re-indenter that keeps comments in place (default)
//! - [`experimental`]: parse and re-emit round trip through `serde_yaml`

pub mod basic;
mod config;
pub mod error;
pub mod experimental;

pub use basic::{BasicConfig, BasicFormatter};
pub use config::TYPE_KEY;
pub use error::FormatterError;
pub use experimental::{ExperimentalConfig, ExperimentalFormatter};

use serde_json::{Map, Value};
use yamlfmt_feature::FeatureList;

/// Byte-in, byte-out YAML normalizer.
///
/// `format` must be deterministic and idempotent: formatting already
/// formatted output returns it unchanged.
pub trait Formatter: Send + Sync {
    fn type_tag(&self) -> &'static str;

    fn format(&self, input: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Configuration as plain values, always including [`TYPE_KEY`].
    fn config_map(&self) -> anyhow::Result<Map<String, Value>>;

    /// Features this backend wants wrapped around every `format` call.
    fn features(&self) -> FeatureList {
        FeatureList::new()
    }
}

pub trait FormatterFactory: Send + Sync {
    fn type_tag(&self) -> &'static str;

    fn new_formatter(&self, config: &Map<String, Value>) -> anyhow::Result<Box<dyn Formatter>>;
}

pub fn builtin_factories() -> Vec<Box<dyn FormatterFactory>> {
    vec![
        Box::new(basic::BasicFormatterFactory),
        Box::new(experimental::ExperimentalFormatterFactory),
    ]
}

/// Factories by type tag.
pub struct FormatterRegistry {
    factories: Vec<Box<dyn FormatterFactory>>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormatterRegistry {
    pub fn builtin() -> Self {
        Self {
            factories: builtin_factories(),
        }
    }

    pub fn with_factories(factories: Vec<Box<dyn FormatterFactory>>) -> Self {
        Self { factories }
    }

    /// Add a factory. A later registration under an existing tag replaces it.
    pub fn register(&mut self, factory: Box<dyn FormatterFactory>) {
        self.factories.retain(|f| f.type_tag() != factory.type_tag());
        self.factories.push(factory);
    }

    pub fn type_tags(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.type_tag()).collect()
    }

    /// Build the formatter registered under `type_tag`.
    ///
    /// An empty tag selects the basic formatter.
    pub fn create(
        &self,
        type_tag: &str,
        config: &Map<String, Value>,
    ) -> anyhow::Result<Box<dyn Formatter>> {
        let type_tag = if type_tag.is_empty() {
            basic::BASIC_FORMATTER_TYPE
        } else {
            type_tag
        };
        let factory = self
            .factories
            .iter()
            .find(|f| f.type_tag() == type_tag)
            .ok_or_else(|| FormatterError::UnknownType {
                type_tag: type_tag.to_string(),
                known: self.type_tags().iter().map(|t| t.to_string()).collect(),
            })?;
        factory.new_formatter(config)
    }
}
