use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatterError {
    /// No factory is registered under the requested type tag.
    #[error("unknown formatter type '{type_tag}' (known: {})", .known.join(", "))]
    UnknownType { type_tag: String, known: Vec<String> },

    /// The configuration map does not describe a valid formatter config.
    #[error("invalid {type_tag} formatter config: {message}")]
    InvalidConfig { type_tag: String, message: String },

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
