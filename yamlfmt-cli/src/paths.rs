//! Expansion of command-line path arguments into the files to process.
//!
//! - directories are walked recursively and filtered by the include globs
//! - arguments with glob metacharacters are expanded
//! - anything else is taken as a file path as given
//!
//! Exclude globs are applied to every candidate. The result keeps
//! first-seen order with duplicates removed.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use tracing::debug;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled include and exclude globs.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            include: compile(include).context("invalid include pattern")?,
            exclude: compile(exclude).context("invalid exclude pattern")?,
        })
    }

    /// `relative` is the path below the directory being walked.
    pub fn is_included(&self, relative: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    /// Checked against the path as given and, when known, relative to the
    /// walked directory.
    pub fn is_excluded(&self, path: &str, relative: Option<&str>) -> bool {
        self.exclude.iter().any(|p| {
            p.matches_with(path, MATCH_OPTIONS)
                || relative.is_some_and(|r| p.matches_with(r, MATCH_OPTIONS))
        })
    }
}

fn compile(patterns: &[String]) -> anyhow::Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("'{}'", p)))
        .collect()
}

/// Resolve `args` into files. No arguments means the current directory.
pub fn collect_paths(args: &[String], filter: &PathFilter) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let defaults = [".".to_string()];
    let args = if args.is_empty() { &defaults[..] } else { args };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |path: Utf8PathBuf| {
        if seen.insert(path.clone()) {
            out.push(path);
        }
    };

    for arg in args {
        let path = Utf8Path::new(arg);
        if path.is_dir() {
            for file in walk_dir(path, filter)? {
                push(file);
            }
        } else if has_glob_meta(arg) {
            for file in expand_glob(arg)? {
                if !filter.is_excluded(file.as_str(), None) {
                    push(file);
                }
            }
        } else if !filter.is_excluded(&normalize(arg), None) {
            push(path.to_path_buf());
        }
    }
    debug!(count = out.len(), "collected paths");
    Ok(out)
}

fn walk_dir(dir: &Utf8Path, filter: &PathFilter) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let pattern = format!("{}/**/*", Pattern::escape(dir.as_str().trim_end_matches('/')));
    let mut files = Vec::new();
    for file in expand_glob(&pattern)? {
        let relative = file
            .strip_prefix(dir)
            .map(|p| normalize(p.as_str()))
            .unwrap_or_else(|_| normalize(file.as_str()));
        if filter.is_included(&relative) && !filter.is_excluded(file.as_str(), Some(&relative)) {
            files.push(file);
        }
    }
    Ok(files)
}

fn expand_glob(pattern: &str) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    let entries = glob::glob_with(pattern, MATCH_OPTIONS)
        .with_context(|| format!("invalid path pattern '{}'", pattern))?;
    for entry in entries {
        let path = entry.with_context(|| format!("expand {}", pattern))?;
        if !path.is_file() {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(path)
            .map_err(|p| anyhow::anyhow!("non UTF-8 path: {}", p.display()))?;
        files.push(path);
    }
    Ok(files)
}

fn has_glob_meta(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => path,
    }
}
