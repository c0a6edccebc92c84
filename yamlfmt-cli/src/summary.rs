//! Machine-readable run summary for `--output-format json`.

use serde::Serialize;
use yamlfmt_core::{EngineOutput, ErrorList, FileDiffs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Format,
    Lint,
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub path: String,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    /// Files that went through the pipeline.
    pub processed: usize,
    pub changed_count: usize,
    pub changed: Vec<String>,
    pub errors: Vec<ErrorSummary>,
}

impl RunSummary {
    pub fn from_output(mode: RunMode, output: &EngineOutput) -> Self {
        Self::new(mode, &output.files, &output.errors)
    }

    pub fn new(mode: RunMode, files: &FileDiffs, errors: &ErrorList) -> Self {
        Self {
            mode,
            processed: files.len(),
            changed_count: files.changed_count(),
            changed: files
                .changed_paths()
                .into_iter()
                .map(|p| p.to_string())
                .collect(),
            errors: errors
                .iter()
                .map(|e| ErrorSummary {
                    path: e.path().to_string(),
                    kind: e.kind(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }

    /// Summary of a format run that failed: only the errors are known.
    pub fn from_errors(mode: RunMode, errors: &ErrorList) -> Self {
        Self::new(mode, &FileDiffs::new(), errors)
    }
}
