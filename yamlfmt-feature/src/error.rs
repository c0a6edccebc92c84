use crate::FeatureApplyMode;
use thiserror::Error;

/// A hook failed while the chain was applied.
///
/// Displays as `Feature {name} {mode}Action failed with error: {cause}` and
/// exposes the hook's own error through [`source`](std::error::Error::source)
/// and [`cause`](FeatureApplyError::cause).
#[derive(Debug, Error)]
#[error("Feature {feature} {mode}Action failed with error: {cause:#}")]
pub struct FeatureApplyError {
    feature: String,
    mode: FeatureApplyMode,
    #[source]
    cause: anyhow::Error,
}

impl FeatureApplyError {
    pub fn new(feature: impl Into<String>, mode: FeatureApplyMode, cause: anyhow::Error) -> Self {
        Self {
            feature: feature.into(),
            mode,
            cause,
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn mode(&self) -> FeatureApplyMode {
        self.mode
    }

    /// The error returned by the failing hook, available for downcasting.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

/// Returned by hooks that observe a cancelled context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;
