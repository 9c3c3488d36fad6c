//! Project file scan and fuzzy filtering for the file finder

use std::path::Path;

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::model::file_tree::is_hidden;

/// Upper bound on files collected by a scan
const MAX_FILES: usize = 20_000;

/// Recursively collect file paths under `root`, relative to it, skipping
/// hidden files and directories
pub fn scan_files(root: &Path) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            // the root itself must be readable, nested failures are skipped
            Err(e) if dir == root => return Err(e),
            Err(e) => {
                tracing::debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if is_hidden(&path) {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                stack.push(path);
            } else if let Ok(relative) = path.strip_prefix(root) {
                files.push(relative.to_string_lossy().replace('\\', "/"));
                if files.len() >= MAX_FILES {
                    tracing::warn!("File scan truncated at {} entries", MAX_FILES);
                    files.sort();
                    return Ok(files);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Indices of `files` matching `query`, best first. An empty query keeps
/// the original order.
pub fn filter(files: &[String], query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..files.len()).collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT.match_paths());
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
    let mut buf = Vec::new();

    let mut scored: Vec<(usize, u32)> = files
        .iter()
        .enumerate()
        .filter_map(|(idx, file)| {
            pattern
                .score(Utf32Str::new(file, &mut buf), &mut matcher)
                .map(|score| (idx, score))
        })
        .collect();
    // stable sort keeps path order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(idx, _)| idx).collect()
}
