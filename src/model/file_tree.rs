//! File tree sidebar state and directory listing

use std::path::{Path, PathBuf};

/// Width of the sidebar in cells
pub const SIDEBAR_WIDTH: u16 = 25;

/// A single entry of the listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl TreeEntry {
    pub fn new(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path, is_dir }
    }
}

/// Inline prompt shown at the bottom of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreePrompt {
    /// New file, or directory when the name ends with `/`
    Create { input: String },
    Rename { from: PathBuf, input: String },
    /// Waiting for `y`/`n`
    ConfirmDelete { target: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct FileTreeState {
    pub visible: bool,
    /// Directory being listed; results for any other path are stale
    pub root: PathBuf,
    pub entries: Vec<TreeEntry>,
    pub selected: usize,
    /// A listing for `root` is in flight
    pub loading: bool,
    pub prompt: Option<TreePrompt>,
}

impl FileTreeState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    pub fn selected_entry(&self) -> Option<&TreeEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Install a completed listing
    pub fn set_entries(&mut self, entries: Vec<TreeEntry>) {
        self.entries = entries;
        self.loading = false;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }
}

/// List one directory level: hidden entries skipped, directories first,
/// then case-insensitive by name
pub fn list_directory(dir: &Path) -> std::io::Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(TreeEntry::new(path, is_dir));
    }
    sort_entries(&mut entries);
    Ok(entries)
}

/// Dotfiles and dot-directories
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn sort_entries(entries: &mut [TreeEntry]) {
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_directory_sorts_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("A.txt"), "").unwrap();
        std::fs::write(dir.path().join(".env"), "").unwrap();
        std::fs::create_dir(dir.path().join("zdir")).unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        let names: Vec<String> = list_directory(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["zdir", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_set_entries_clamps_selection() {
        let mut state = FileTreeState::new(PathBuf::from("/tmp"));
        state.selected = 5;
        state.loading = true;
        state.set_entries(vec![TreeEntry::new(PathBuf::from("/tmp/a"), false)]);
        assert_eq!(state.selected, 0);
        assert!(!state.loading);
    }
}
