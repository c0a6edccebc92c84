//! The formatting engine.
//!
//! Files are processed sequentially in input order. Every file gets a fresh
//! [`FeatureContext`] sharing the engine's [`CancelToken`].

use crate::adapters::FsSourceReader;
use crate::error::{EngineError, ErrorList, FileError};
use crate::output::EngineOutput;
use crate::ports::SourceReader;
use crate::settings::EngineSettings;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};
use yamlfmt_diff::{FileDiff, FileDiffs, FormatDiff};
use yamlfmt_feature::{CancelToken, FeatureApplyMode, FeatureContext, FeatureList};
use yamlfmt_formatters::Formatter;
use yamlfmt_schema::YamlSchemas;

pub const LINT_MESSAGE: &str = "The following formatting differences were found:";
pub const DRY_RUN_MESSAGE: &str = "The following files would be formatted:";

pub struct Engine {
    formatter: Box<dyn Formatter>,
    features: FeatureList,
    schemas: YamlSchemas,
    source: Box<dyn SourceReader>,
    settings: EngineSettings,
    cancel: CancelToken,
}

impl Engine {
    /// Engine around `formatter` with no features and no schemas, reading
    /// from the filesystem.
    pub fn new(formatter: Box<dyn Formatter>, settings: EngineSettings) -> Self {
        Self {
            formatter,
            features: FeatureList::new(),
            schemas: YamlSchemas::default(),
            source: Box::new(FsSourceReader),
            settings,
            cancel: CancelToken::new(),
        }
    }

    /// Like [`Engine::new`], with the formatter's own features installed
    /// first.
    pub fn from_settings(formatter: Box<dyn Formatter>, settings: EngineSettings) -> Self {
        let features = formatter.features();
        Self::new(formatter, settings).with_features(features)
    }

    /// Append `features` after the ones already installed.
    pub fn with_features(mut self, features: FeatureList) -> Self {
        self.features.extend(features);
        self
    }

    pub fn with_schemas(mut self, schemas: YamlSchemas) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn with_source(mut self, source: Box<dyn SourceReader>) -> Self {
        self.source = source;
        self
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn features(&self) -> &FeatureList {
        &self.features
    }

    pub fn schemas(&self) -> &YamlSchemas {
        &self.schemas
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Handle that stops the remaining work of any running operation.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the feature and formatter pipeline on one buffer.
    ///
    /// Schemas are not consulted. The output uses the configured line
    /// ending, or the one `content` already uses.
    pub fn format_content(&self, content: &[u8]) -> Result<Vec<u8>, EngineError> {
        let mut ctx = FeatureContext::with_cancel_token(self.cancel.clone());
        let formatted = self.pipeline(&mut ctx, content)?;
        Ok(self.settings.line_ending_for(content).apply(&formatted))
    }

    /// Format every path and rewrite the files that changed.
    ///
    /// Returns the diffs when every file was read, formatted and written.
    /// Otherwise the error list carries the read and pipeline failures
    /// followed by the write failures.
    pub fn format(&self, paths: &[Utf8PathBuf]) -> Result<FileDiffs, ErrorList> {
        let (files, mut errors) = self.collect(paths);
        if let Err(failed) = files.apply_all() {
            for err in failed {
                warn!(path = %err.path, error = %err.source, "write failed");
                errors.push(FileError::Write(err));
            }
        }
        info!(
            files = files.len(),
            changed = files.changed_count(),
            errors = errors.len(),
            "format finished"
        );
        if errors.is_empty() {
            Ok(files)
        } else {
            Err(errors)
        }
    }

    /// Report formatting differences without writing anything.
    pub fn lint(&self, paths: &[Utf8PathBuf]) -> EngineOutput {
        self.report(paths, LINT_MESSAGE)
    }

    /// List the files `format` would rewrite without writing anything.
    pub fn dry_run(&self, paths: &[Utf8PathBuf]) -> EngineOutput {
        self.report(paths, DRY_RUN_MESSAGE)
    }

    fn report(&self, paths: &[Utf8PathBuf], heading: &str) -> EngineOutput {
        let (files, errors) = self.collect(paths);
        info!(
            files = files.len(),
            changed = files.changed_count(),
            errors = errors.len(),
            "check finished"
        );
        let message = if files.changed_count() > 0 {
            heading.to_string()
        } else {
            String::new()
        };
        EngineOutput {
            message,
            files,
            quiet: self.settings.quiet,
            errors,
        }
    }

    fn collect(&self, paths: &[Utf8PathBuf]) -> (FileDiffs, ErrorList) {
        let mut files = FileDiffs::new();
        let mut errors = ErrorList::new();
        for path in paths {
            match self.process(path) {
                Ok(diff) => files.push(diff),
                Err(err) => {
                    warn!(path = %path, kind = err.kind(), "{}", err);
                    errors.push(err);
                }
            }
        }
        (files, errors)
    }

    fn process(&self, path: &Utf8Path) -> Result<FileDiff, FileError> {
        if self.cancel.is_cancelled() {
            return Err(FileError::Cancelled {
                path: path.to_path_buf(),
            });
        }

        let original = self.source.read(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path, bytes = original.len(), "read");

        if let Err(source) = self.schemas.validate(path.as_str(), &original) {
            if !source.is_no_path_match() {
                return Err(FileError::Schema {
                    path: path.to_path_buf(),
                    source,
                });
            }
        } else {
            debug!(path = %path, "schema check passed");
        }

        let mut ctx = FeatureContext::with_cancel_token(self.cancel.clone());
        let formatted = self
            .pipeline(&mut ctx, &original)
            .map_err(|err| FileError::from_engine(path, err))?;

        let ending = self.settings.line_ending_for(&original);
        let formatted = ending.apply(&formatted);
        let diff = FormatDiff::new(original, formatted, ending.as_str());
        debug!(path = %path, changed = diff.changed(), "formatted");
        Ok(FileDiff::new(path, diff))
    }

    fn pipeline(&self, ctx: &mut FeatureContext, content: &[u8]) -> Result<Vec<u8>, EngineError> {
        ctx.ensure_not_cancelled()?;
        let pre = self
            .features
            .apply_features(ctx, content, FeatureApplyMode::Before)?;
        ctx.ensure_not_cancelled()?;
        let mid = self
            .formatter
            .format(&pre)
            .map_err(|source| EngineError::Formatter {
                type_tag: self.formatter.type_tag(),
                source,
            })?;
        let post = self
            .features
            .apply_features(ctx, &mid, FeatureApplyMode::After)?;
        Ok(post)
    }
}
