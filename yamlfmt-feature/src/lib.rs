//! Feature chains: named byte transformations run before and after a formatter.
//!
//! A [`Feature`] carries an optional before hook and an optional after hook.
//! A [`FeatureList`] applies one mode's hooks in insertion order, threading a
//! [`FeatureContext`] and the current buffer from hook to hook, and stops at the
//! first failure with a [`FeatureApplyError`] naming the feature and the mode.

mod context;
pub mod error;

pub use context::{CancelToken, FeatureContext};
pub use error::{Cancelled, FeatureApplyError};

use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Hook signature: transform the buffer, optionally reading or writing the context.
pub type FeatureFunc =
    Arc<dyn Fn(&mut FeatureContext, Vec<u8>) -> anyhow::Result<Vec<u8>> + Send + Sync>;

/// Which hook of each feature to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureApplyMode {
    Before,
    After,
}

impl fmt::Display for FeatureApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureApplyMode::Before => f.write_str("Before"),
            FeatureApplyMode::After => f.write_str("After"),
        }
    }
}

#[derive(Clone)]
pub struct Feature {
    pub name: String,
    pub before: Option<FeatureFunc>,
    pub after: Option<FeatureFunc>,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            after: None,
        }
    }

    pub fn with_before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut FeatureContext, Vec<u8>) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    pub fn with_after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut FeatureContext, Vec<u8>) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    pub fn hook(&self, mode: FeatureApplyMode) -> Option<&FeatureFunc> {
        match mode {
            FeatureApplyMode::Before => self.before.as_ref(),
            FeatureApplyMode::After => self.after.as_ref(),
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Ordered features. The same order is used for both modes.
#[derive(Debug, Clone, Default)]
pub struct FeatureList(Vec<Feature>);

impl FeatureList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.0.push(feature);
    }

    pub fn extend(&mut self, other: FeatureList) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|f| f.name.as_str()).collect()
    }

    /// Run every hook of `mode` over a copy of `input`.
    ///
    /// Features without a hook for `mode` are skipped. A cancelled context
    /// fails at the next hook that would run. On error the context keeps
    /// whatever earlier hooks stored in it.
    pub fn apply_features(
        &self,
        ctx: &mut FeatureContext,
        input: &[u8],
        mode: FeatureApplyMode,
    ) -> Result<Vec<u8>, FeatureApplyError> {
        let mut result = input.to_vec();
        for feature in &self.0 {
            let Some(hook) = feature.hook(mode) else {
                continue;
            };
            if let Err(cancelled) = ctx.ensure_not_cancelled() {
                return Err(FeatureApplyError::new(&feature.name, mode, cancelled.into()));
            }
            debug!(feature = %feature.name, %mode, "applying feature");
            result = hook(ctx, result)
                .map_err(|cause| FeatureApplyError::new(&feature.name, mode, cause))?;
        }
        Ok(result)
    }
}

impl From<Vec<Feature>> for FeatureList {
    fn from(features: Vec<Feature>) -> Self {
        Self(features)
    }
}

impl FromIterator<Feature> for FeatureList {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureList {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
