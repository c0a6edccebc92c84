use crate::error::ErrorList;
use std::fmt;
use yamlfmt_diff::FileDiffs;

/// Result of a lint or dry run.
#[derive(Debug, Default)]
pub struct EngineOutput {
    /// Heading shown above the file list; empty when nothing changed.
    pub message: String,
    pub files: FileDiffs,
    pub quiet: bool,
    pub errors: ErrorList,
}

impl EngineOutput {
    /// True when any file changed or any file failed.
    pub fn has_failures(&self) -> bool {
        self.files.changed_count() > 0 || !self.errors.is_empty()
    }

    /// Rendered file section: changed paths when quiet, full diffs otherwise.
    pub fn files_output(&self) -> String {
        if self.quiet {
            self.files.str_output_quiet()
        } else {
            self.files.str_output()
        }
    }
}

impl fmt::Display for EngineOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}\n\n", self.message)?;
        }
        let files = self.files_output();
        if !files.is_empty() {
            writeln!(f, "{}", files)?;
        }
        Ok(())
    }
}
