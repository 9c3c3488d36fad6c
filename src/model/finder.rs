//! Fuzzy file finder overlay state

use std::path::PathBuf;

/// Rows of results shown at once
pub const FINDER_MAX_RESULTS: usize = 15;

#[derive(Debug, Clone, Default)]
pub struct FinderState {
    /// Directory the scan was issued for
    pub root: PathBuf,
    pub query: String,
    /// Relative paths from the last completed scan
    pub files: Vec<String>,
    /// Indices into `files` that match `query`, best first
    pub matches: Vec<usize>,
    pub selected: usize,
    pub scanning: bool,
}

impl FinderState {
    pub fn open(root: PathBuf) -> Self {
        Self {
            root,
            scanning: true,
            ..Self::default()
        }
    }

    pub fn refilter(&mut self) {
        self.matches = crate::finder::filter(&self.files, &self.query);
        self.selected = 0;
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.matches
            .get(self.selected)
            .and_then(|&idx| self.files.get(idx))
            .map(|rel| self.root.join(rel))
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.matches.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
