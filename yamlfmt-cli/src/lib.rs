//! Library half of the `yamlfmt` binary: configuration, path discovery and
//! run summaries, kept out of `main.rs` so they can be tested directly.

pub mod config;
pub mod paths;
pub mod summary;
