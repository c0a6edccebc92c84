use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema's glob does not cover the path. Not a failure: callers use
    /// it to move on to the next schema.
    #[error("no schema matches path")]
    NoPathMatch,

    /// The configured match pattern is not a valid glob.
    #[error("invalid schema match pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// The schema could not be loaded or compiled.
    #[error("compile schema {url}: {message}")]
    Compile { url: String, message: String },

    /// The document is not valid YAML.
    #[error("parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The document parsed but does not conform to the schema.
    #[error("{path} does not conform to schema {url}:\n{}", .violations.join("\n"))]
    Invalid {
        url: String,
        path: String,
        violations: Vec<String>,
    },
}

impl SchemaError {
    pub fn is_no_path_match(&self) -> bool {
        matches!(self, SchemaError::NoPathMatch)
    }
}
