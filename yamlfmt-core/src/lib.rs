//! Embeddable engine for yamlfmt.
//!
//! Provides a clap-free entry point that runs the formatting pipeline over
//! in-memory content or a batch of files.
//!
//! # Pipeline
//!
//! For every file: read through the [`SourceReader`](ports::SourceReader)
//! port, consult the schema registry, run before-features, the formatter and
//! after-features, then convert line endings and record a
//! [`FileDiff`](yamlfmt_diff::FileDiff). Per-file failures are collected in
//! an [`ErrorList`] and never stop the batch.
//!
//! # Entry points
//!
//! - [`Engine::format_content`]: one buffer in, formatted buffer out
//! - [`Engine::format`]: rewrite changed files in place
//! - [`Engine::lint`]: report differences without writing
//! - [`Engine::dry_run`]: list files that would be rewritten

pub mod adapters;
mod engine;
pub mod error;
mod output;
pub mod ports;
pub mod settings;

pub use engine::{DRY_RUN_MESSAGE, Engine, LINT_MESSAGE};
pub use error::{EngineError, ErrorList, FileError};
pub use output::EngineOutput;
pub use settings::EngineSettings;

// Re-export the diff model so embedders don't need yamlfmt-diff directly.
pub use yamlfmt_diff::{FileDiff, FileDiffs, FormatDiff, LineEnding};
