//! Recursive marker discovery.
//!
//! Each directory lists its regular files before its subdirectories, both in
//! lexical order, so "first marker in a directory" is the same on every
//! filesystem. At most one marker is taken per directory.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn files_before_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_marker(entry: &DirEntry, marker_token: &str) -> bool {
    entry.file_type().is_file() && entry.file_name().to_string_lossy().contains(marker_token)
}

/// Walks `root` depth-first and returns marker paths in discovery order.
///
/// A directory that can't be listed is logged and contributes nothing; the
/// walk carries on with its siblings.
pub fn find_marker_paths(root: &Path, marker_token: &str) -> Vec<PathBuf> {
    collect_markers(walker(root), marker_token)
}

fn walker(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by(files_before_dirs)
        .into_iter()
}

fn collect_markers<I>(entries: I, marker_token: &str) -> Vec<PathBuf>
where
    I: IntoIterator<Item = walkdir::Result<DirEntry>>,
{
    let mut found = Vec::new();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                tracing::warn!(path = %path, "error accessing directory: {}", e);
                continue;
            }
        };
        if !is_marker(&entry, marker_token) {
            continue;
        }
        let Some(dir) = entry.path().parent() else {
            continue;
        };
        if claimed.insert(dir.to_path_buf()) {
            found.push(entry.into_path());
        } else {
            tracing::debug!(
                path = %entry.path().display(),
                "ignoring extra marker; directory already has one"
            );
        }
    }
    found
}
