//! Version-control panel state

use std::path::PathBuf;

use crate::vcs::{StatusEntry, VcsSnapshot};

/// Height of the panel in rows
pub const VCS_PANEL_HEIGHT: u16 = 10;

#[derive(Debug, Clone, Default)]
pub struct VcsPanelState {
    pub visible: bool,
    /// Working directory the panel reflects
    pub root: PathBuf,
    pub snapshot: VcsSnapshot,
    pub selected: usize,
    /// A status query or mutating command is in flight
    pub loading: bool,
    /// A push is streaming output
    pub pushing: bool,
    /// `git add -A` is running and the commit prompt opens when it finishes
    pub staging_all: bool,
}

impl VcsPanelState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    pub fn selected_entry(&self) -> Option<&StatusEntry> {
        self.snapshot.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.snapshot.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn apply_snapshot(&mut self, snapshot: VcsSnapshot) {
        self.snapshot = snapshot;
        self.loading = false;
        if self.selected >= self.snapshot.entries.len() {
            self.selected = self.snapshot.entries.len().saturating_sub(1);
        }
    }

    /// Short summary for the status bar, e.g. `main +2 -1`
    pub fn summary(&self) -> Option<String> {
        if !self.snapshot.is_repo {
            return None;
        }
        let mut out = self.snapshot.branch.clone();
        if self.snapshot.ahead > 0 {
            out.push_str(&format!(" +{}", self.snapshot.ahead));
        }
        if self.snapshot.behind > 0 {
            out.push_str(&format!(" -{}", self.snapshot.behind));
        }
        Some(out)
    }
}
