//! File system walking and path eligibility filtering.
//!
//! Decides which paths are indexed: directory exclusion at any
//! ancestor depth, a textual extension allow-list, and a bounded
//! binary-content sniff for extensionless files. Handles walk errors
//! gracefully (permission denied, etc.) without crashing.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::Result;

/// Directory names that are never descended into, at any depth.
/// Version-control metadata, dependency caches, virtual environments.
static EXCLUDED_DIRS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".git",
        ".svn",
        ".hg",
        "node_modules",
        "target",
        "__pycache__",
        ".venv",
        "venv",
        ".tox",
        ".mypy_cache",
        ".cache",
        "dist",
        "build",
        "vendor",
    ]
    .into_iter()
    .collect()
});

/// Version-control metadata directories. A subset of
/// [`EXCLUDED_DIRS`], also consulted at query time to drop stale
/// entries indexed before the exclusion list covered them.
static VCS_DIRS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| [".git", ".svn", ".hg"].into_iter().collect());

/// Extensions always eligible for indexing (no leading dot). Not
/// exhaustive; extended via `indexing.extra_extensions`.
static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "txt", "md", "markdown", "py", "js", "ts", "json", "yaml", "yml", "sh", "sql", "rs",
        "toml", "html", "css", "csv", "rst", "ini", "cfg", "log",
    ]
    .into_iter()
    .collect()
});

/// Bytes inspected when sniffing extensionless files
const SNIFF_LEN: usize = 1024;

/// Returns true if any ancestor directory component of `path` is a
/// version-control metadata directory.
pub fn is_under_vcs_dir(path: &Path) -> bool {
    path.ancestors()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .any(|name| VCS_DIRS.contains(name))
}

/// Path eligibility filter
pub struct PathFilter {
    /// User-configured extensions beyond the built-in allow-list
    extra_extensions: HashSet<String>,
}

impl PathFilter {
    /// Create a filter with additional allow-listed extensions
    pub fn new(extra_extensions: &[String]) -> Self {
        Self {
            extra_extensions: extra_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Decide whether a file is eligible for indexing.
    ///
    /// Pure predicate over the path and (for extensionless files)
    /// one bounded read of the file's head.
    pub fn is_eligible(&self, path: &Path) -> bool {
        if self.is_under_excluded_dir(path) {
            return false;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                TEXT_EXTENSIONS.contains(ext.as_str()) || self.extra_extensions.contains(&ext)
            }
            None => sniff_is_text(path),
        }
    }

    /// Check every ancestor directory name, not just the immediate
    /// parent.
    fn is_under_excluded_dir(&self, path: &Path) -> bool {
        path.ancestors()
            .skip(1)
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .any(|name| EXCLUDED_DIRS.contains(name))
    }

    /// Collect all eligible files under a directory.
    ///
    /// Excluded directories are pruned during the walk so their
    /// subtrees are never visited. Walk errors are logged and
    /// skipped.
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| should_descend(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let path = entry.path();
                    if self.is_eligible(path) {
                        files.push(path.to_path_buf());
                    } else {
                        tracing::debug!("Skipping ineligible file: {:?}", path);
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                }
            }
        }

        Ok(files)
    }
}

/// Prune excluded directories early. Never filters the root itself.
fn should_descend(entry: &DirEntry, root: &Path) -> bool {
    let path = entry.path();
    if path == root {
        return true;
    }
    if entry.file_type().is_dir() {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if EXCLUDED_DIRS.contains(name) {
                tracing::debug!("Skipping excluded directory: {:?}", path);
                return false;
            }
        }
    }
    true
}

/// Binary-content sniff for extensionless files.
///
/// Reads up to [`SNIFF_LEN`] bytes. An empty file counts as text; a
/// NUL byte anywhere marks it binary; otherwise the head must decode
/// as UTF-8, with a permissive Latin-1 fallback for legacy files.
fn sniff_is_text(path: &Path) -> bool {
    let mut head = [0u8; SNIFF_LEN];
    let n = match File::open(path).and_then(|mut f| f.read(&mut head)) {
        Ok(n) => n,
        Err(e) => {
            tracing::debug!("Sniff failed for {:?}: {}", path, e);
            return false;
        }
    };

    let head = &head[..n];
    if head.is_empty() {
        return true;
    }
    if head.contains(&0) {
        return false;
    }
    // The UTF-8 check may fail on a multi-byte sequence cut off at
    // the read boundary; Latin-1 accepts any NUL-free byte sequence.
    std::str::from_utf8(head).is_ok() || decode_latin1(head).is_some()
}

/// Permissive single-byte decode. Succeeds for any NUL-free input.
fn decode_latin1(bytes: &[u8]) -> Option<String> {
    if bytes.contains(&0) {
        return None;
    }
    Some(bytes.iter().map(|&b| b as char).collect())
}
