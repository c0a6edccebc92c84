//! Configuration file loading for yamlfmt.
//!
//! Discovers and loads `yamlfmt.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;
use yamlfmt_core::{EngineSettings, LineEnding};
use yamlfmt_formatters::TYPE_KEY;
use yamlfmt_schema::YamlSchemas;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "yamlfmt.toml";

/// Top-level configuration from yamlfmt.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YamlfmtConfig {
    /// Formatter backend: `type` plus that backend's own keys.
    pub formatter: toml::Table,

    /// Engine settings (line ending, quiet output).
    pub engine: EngineSettings,

    /// Which files a directory argument expands to.
    pub paths: PathsConfig,

    /// Schemas checked before formatting, in order.
    pub schemas: Vec<SchemaConfig>,
}

/// Paths section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Globs, relative to a directory argument, selecting files to format.
    pub include: Vec<String>,

    /// Globs for files to skip.
    pub exclude: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.yaml".to_string(), "**/*.yml".to_string()],
            exclude: Vec::new(),
        }
    }
}

/// One `[[schemas]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaConfig {
    /// Schema location: http(s) URL, `file://` URL or plain path.
    pub url: String,

    /// Glob selecting the documents this schema applies to.
    #[serde(rename = "match")]
    pub matches: String,
}

/// Discover the yamlfmt.toml config file.
///
/// Searches for `yamlfmt.toml` in `dir`.
/// Returns `None` if no config file is found.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a yamlfmt.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<YamlfmtConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<YamlfmtConfig> {
    let config: YamlfmtConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<YamlfmtConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(YamlfmtConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    /// Formatter type tag; empty selects the default backend.
    pub formatter_type: String,

    /// Formatter config map, `type` included when set.
    pub formatter: Map<String, Value>,

    pub engine: EngineSettings,

    pub include: Vec<String>,

    /// Exclude globs (from config file, extended by CLI).
    pub exclude: Vec<String>,

    pub schemas: Vec<SchemaConfig>,
}

impl MergedConfig {
    pub fn schema_registry(&self) -> YamlSchemas {
        YamlSchemas::from_pairs(
            self.schemas
                .iter()
                .map(|s| (s.url.as_str(), s.matches.as_str())),
        )
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: YamlfmtConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: YamlfmtConfig) -> Self {
        Self { config }
    }

    /// Merge with CLI arguments.
    ///
    /// `--formatter` keys replace config file keys. `--quiet` and
    /// `--line-ending` override engine settings when given. CLI exclude
    /// globs extend the config file list.
    pub fn merge_cli_args(
        self,
        cli_formatter: &BTreeMap<String, toml::Value>,
        cli_quiet: bool,
        cli_line_ending: Option<LineEnding>,
        cli_exclude: &[String],
    ) -> anyhow::Result<MergedConfig> {
        let mut table = self.config.formatter;
        for (k, v) in cli_formatter {
            table.insert(k.clone(), v.clone());
        }
        let formatter = match serde_json::to_value(&table).context("convert formatter config")? {
            Value::Object(map) => map,
            other => anyhow::bail!("formatter config is not a table: {}", other),
        };
        let formatter_type = match formatter.get(TYPE_KEY) {
            None => String::new(),
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => anyhow::bail!("formatter type must be a string, got {}", other),
        };

        let mut engine = self.config.engine;
        engine.quiet = cli_quiet || engine.quiet;
        if let Some(ending) = cli_line_ending {
            engine.line_ending = Some(ending);
        }

        let mut exclude = self.config.paths.exclude;
        for pattern in cli_exclude {
            if !exclude.contains(pattern) {
                exclude.push(pattern.clone());
            }
        }

        Ok(MergedConfig {
            formatter_type,
            formatter,
            engine,
            include: self.config.paths.include,
            exclude,
            schemas: self.config.schemas,
        })
    }
}

/// Parse CLI params from key=value strings.
pub fn parse_cli_params(params: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for entry in params {
        let mut parts = entry.splitn(2, '=');
        let key = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid param '{}': missing key", entry))?;
        let value = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid param '{}': missing value", entry))?;
        out.insert(key.to_string(), value.to_string());
    }
    Ok(out)
}

/// Parse `--formatter` params, reading each value as a TOML scalar
/// (`4`, `true`, `"x"`) and falling back to a plain string.
pub fn parse_formatter_params(params: &[String]) -> anyhow::Result<BTreeMap<String, toml::Value>> {
    Ok(parse_cli_params(params)?
        .into_iter()
        .map(|(k, v)| (k, parse_scalar(&v)))
        .collect())
}

fn parse_scalar(raw: &str) -> toml::Value {
    let parsed = toml::from_str::<toml::Table>(&format!("v = {}", raw))
        .ok()
        .filter(|table| table.len() == 1)
        .and_then(|mut table| table.remove("v"));
    match parsed {
        Some(value @ (toml::Value::Integer(_)
        | toml::Value::Float(_)
        | toml::Value::Boolean(_)
        | toml::Value::String(_))) => value,
        _ => toml::Value::String(raw.to_string()),
    }
}
