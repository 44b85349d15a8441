//! Source file enumeration
//!
//! Turns the configured source into the concrete list of files to upload,
//! either by walking a directory or by expanding glob patterns.
//!
//! # Modes
//!
//! | Mode | Input | Key component |
//! |------|-------|---------------|
//! | Directory | `source_dir` | path relative to the directory |
//! | Patterns | `source_files` | base name of the matched file |
//!
//! A directory wins when both inputs are set; the modes never combine.

pub mod key;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Enumeration errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No files to upload")]
    NoFiles,

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Source directory '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read source directory '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Where the files to upload come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Directory(PathBuf),
    Patterns(Vec<String>),
    Empty,
}

impl SourceSpec {
    /// Select the mode from the optional inputs; the directory wins.
    pub fn from_inputs(source_dir: Option<&str>, source_files: Option<&str>) -> Self {
        match (source_dir, source_files) {
            (Some(dir), _) => Self::Directory(PathBuf::from(dir)),
            (None, Some(files)) => {
                let patterns = parse_patterns(files);
                if patterns.is_empty() {
                    Self::Empty
                } else {
                    Self::Patterns(patterns)
                }
            }
            (None, None) => Self::Empty,
        }
    }
}

/// Split newline separated patterns, dropping blank lines.
pub fn parse_patterns(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A resolved file and the key component derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of a regular file
    pub path: PathBuf,
    /// Slash-separated component appended to the destination prefix
    pub relative: String,
}

/// Enumerate files relative to the current working directory
pub fn enumerate(spec: &SourceSpec) -> Result<Vec<FileEntry>, SourceError> {
    let cwd = std::env::current_dir()?;
    enumerate_in(spec, &cwd)
}

/// Enumerate files, resolving relative inputs against `base`.
///
/// An empty result is an error in every mode.
pub fn enumerate_in(spec: &SourceSpec, base: &Path) -> Result<Vec<FileEntry>, SourceError> {
    let entries = match spec {
        SourceSpec::Directory(dir) => walk_directory(&base.join(dir))?,
        SourceSpec::Patterns(patterns) => expand_patterns(patterns, base)?,
        SourceSpec::Empty => Vec::new(),
    };

    if entries.is_empty() {
        return Err(SourceError::NoFiles);
    }

    tracing::debug!(files = entries.len(), "Enumerated source files");
    Ok(entries)
}

fn walk_directory(root: &Path) -> Result<Vec<FileEntry>, SourceError> {
    if root.exists() && !root.is_dir() {
        return Err(SourceError::NotADirectory(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                tracing::warn!(path = ?e.path(), "skipping broken symlink");
                continue;
            }
            Err(source) => {
                return Err(SourceError::Walk {
                    path: root.to_path_buf(),
                    source,
                })
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        entries.push(FileEntry {
            relative: key::slash_path(relative),
            path: entry.path().to_path_buf(),
        });
    }

    Ok(entries)
}

/// A link below the root whose target no longer exists
fn is_dangling_link(e: &walkdir::Error) -> bool {
    let not_found = e
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    let is_link = e
        .path()
        .is_some_and(|path| path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink()));

    e.depth() > 0 && not_found && is_link
}

fn expand_patterns(patterns: &[String], base: &Path) -> Result<Vec<FileEntry>, SourceError> {
    // Syntax errors abort before any pattern touches the file system.
    for pattern in patterns {
        glob::Pattern::new(pattern).map_err(|source| SourceError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
    }

    // Keyed by canonical path for de-duplication; the value is the path as
    // matched, whose base name becomes the key even when it is a symlink.
    let mut matched = BTreeMap::new();
    for pattern in patterns {
        let anchored = anchor_pattern(pattern, base);
        let paths = glob::glob(&anchored).map_err(|source| SourceError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        let mut count = 0usize;
        for path in paths {
            let path = match path {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(
                        pattern = %pattern,
                        path = %e.path().display(),
                        "skipping unreadable path: {}",
                        e.error()
                    );
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            matched.entry(path.canonicalize()?).or_insert(path);
            count += 1;
        }

        if count == 0 {
            tracing::warn!("no files matched pattern '{}'", pattern);
        } else {
            tracing::debug!(pattern = %pattern, matches = count, "Pattern expanded");
        }
    }

    Ok(matched
        .into_iter()
        .filter_map(|(path, as_matched)| {
            let relative = as_matched.file_name()?.to_string_lossy().into_owned();
            Some(FileEntry { path, relative })
        })
        .collect())
}

/// Make a relative pattern relative to `base` instead of the process cwd.
fn anchor_pattern(pattern: &str, base: &Path) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }

    let escaped = glob::Pattern::escape(&base.to_string_lossy());
    format!("{}/{}", escaped.trim_end_matches('/'), pattern)
}
