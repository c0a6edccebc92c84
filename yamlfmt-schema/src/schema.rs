use crate::SchemaError;
use fs_err as fs;
use glob::{MatchOptions, Pattern};
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::debug;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A JSON schema applied to every document whose path matches `matches`.
///
/// The schema is loaded and compiled the first time a path matches; files
/// outside the glob never trigger a fetch.
pub struct YamlSchema {
    url: String,
    matches: String,
    pattern: OnceLock<Result<Pattern, String>>,
    compiled: Mutex<Option<Arc<Validator>>>,
}

impl YamlSchema {
    pub fn new(url: impl Into<String>, matches: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            matches: matches.into(),
            pattern: OnceLock::new(),
            compiled: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn matches(&self) -> &str {
        &self.matches
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Validate `data` when `path` falls under this schema's glob.
    ///
    /// Returns [`SchemaError::NoPathMatch`] for paths outside the glob.
    pub fn validate(&self, path: &str, data: &[u8]) -> Result<(), SchemaError> {
        if !self.match_path(path)? {
            return Err(SchemaError::NoPathMatch);
        }
        let validator = self.validator()?;

        let mut violations = Vec::new();
        for document in parse_documents(path, data)? {
            for err in validator.iter_errors(&document) {
                let location = err.instance_path().to_string();
                let location = if location.is_empty() {
                    "/".to_string()
                } else {
                    location
                };
                violations.push(format!("{}: {}", location, err));
            }
        }

        if violations.is_empty() {
            debug!(path, url = %self.url, "schema validation passed");
            Ok(())
        } else {
            Err(SchemaError::Invalid {
                url: self.url.clone(),
                path: path.to_string(),
                violations,
            })
        }
    }

    fn match_path(&self, path: &str) -> Result<bool, SchemaError> {
        let pattern = self
            .pattern
            .get_or_init(|| Pattern::new(&self.matches).map_err(|e| e.to_string()));
        match pattern {
            Ok(pattern) => Ok(pattern.matches_with(&normalize_path(path), MATCH_OPTIONS)),
            Err(message) => Err(SchemaError::InvalidGlob {
                pattern: self.matches.clone(),
                message: message.clone(),
            }),
        }
    }

    fn validator(&self) -> Result<Arc<Validator>, SchemaError> {
        let mut slot = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(validator) = slot.as_ref() {
            return Ok(Arc::clone(validator));
        }

        debug!(url = %self.url, "compiling schema");
        let document = self.load_schema()?;
        let validator = jsonschema::options()
            .build(&document)
            .map_err(|e| self.compile_error(e))?;
        let validator = Arc::new(validator);
        *slot = Some(Arc::clone(&validator));
        Ok(validator)
    }

    fn load_schema(&self) -> Result<Value, SchemaError> {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            // Remote documents are fetched by the validator's own retriever.
            return Ok(serde_json::json!({ "$ref": self.url }));
        }

        let path = self.url.strip_prefix("file://").unwrap_or(&self.url);
        let text = fs::read_to_string(path).map_err(|e| self.compile_error(e))?;
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) => serde_yaml::from_str(&text).map_err(|e| self.compile_error(e)),
        }
    }

    fn compile_error(&self, err: impl fmt::Display) -> SchemaError {
        SchemaError::Compile {
            url: self.url.clone(),
            message: err.to_string(),
        }
    }
}

impl fmt::Debug for YamlSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlSchema")
            .field("url", &self.url)
            .field("matches", &self.matches)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => path,
    }
}

fn parse_documents(path: &str, data: &[u8]) -> Result<Vec<Value>, SchemaError> {
    serde_yaml::Deserializer::from_slice(data)
        .map(|document| {
            Value::deserialize(document).map_err(|e| SchemaError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
