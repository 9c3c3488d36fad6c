//! Session - ordered tabs, each holding one or two panes
//!
//! Panes and tabs are addressed by stable integer ids so asynchronous results
//! (a file finishing loading, for example) can find their target even after
//! the layout changed, and drop themselves if it is gone.

use super::buffer::Buffer;
use super::pane::Pane;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u64);

/// Unique identifier for a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

/// Most panes a single tab can hold
pub const MAX_PANES_PER_TAB: usize = 2;

// ============================================================================
// Tabs
// ============================================================================

/// How the panes of a tab are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitKind {
    /// Single pane
    #[default]
    None,
    /// Side by side
    Vertical,
    /// Stacked
    Horizontal,
}

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    /// One or two panes; `split` is `None` iff there is exactly one
    pub panes: Vec<Pane>,
    pub active_pane: usize,
    pub split: SplitKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitError {
    /// Tab already holds the maximum number of panes
    MaxPanes,
    /// `SplitKind::None` is not a split
    NotASplit,
}

impl Tab {
    pub fn new(id: TabId, pane: Pane) -> Self {
        Self {
            id,
            name: pane.title(),
            panes: vec![pane],
            active_pane: 0,
            split: SplitKind::None,
        }
    }

    pub fn active(&self) -> &Pane {
        &self.panes[self.active_pane]
    }

    pub fn active_mut(&mut self) -> &mut Pane {
        &mut self.panes[self.active_pane]
    }

    /// Add a second pane and focus it
    pub fn split(&mut self, kind: SplitKind, pane: Pane) -> Result<(), SplitError> {
        if kind == SplitKind::None {
            return Err(SplitError::NotASplit);
        }
        if self.panes.len() >= MAX_PANES_PER_TAB {
            return Err(SplitError::MaxPanes);
        }
        self.panes.push(pane);
        self.active_pane = self.panes.len() - 1;
        self.split = kind;
        Ok(())
    }

    /// Remove the active pane. The caller guarantees at least two panes.
    fn remove_active(&mut self) -> Pane {
        let removed = self.panes.remove(self.active_pane);
        self.active_pane = self.active_pane.min(self.panes.len() - 1);
        if self.panes.len() == 1 {
            self.split = SplitKind::None;
        }
        removed
    }

    pub fn refresh_name(&mut self) {
        self.name = self.active().title();
    }
}

// ============================================================================
// Session
// ============================================================================

/// Result of closing the active pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab still has a pane
    PaneClosed,
    /// The tab became empty and was removed
    TabClosed,
    /// This was the last pane of the last tab; nothing was removed and the
    /// program should exit
    LastPane,
}

/// Ordered tabs plus the active index. Never empty.
#[derive(Debug, Clone)]
pub struct Session {
    pub tabs: Vec<Tab>,
    pub active_tab: usize,
    next_pane_id: u64,
    next_tab_id: u64,
}

impl Session {
    /// Session with one tab holding `buffer`
    pub fn new(buffer: Buffer) -> Self {
        let mut session = Self {
            tabs: Vec::new(),
            active_tab: 0,
            next_pane_id: 1,
            next_tab_id: 1,
        };
        let pane = session.new_pane(buffer);
        let tab_id = session.next_tab_id();
        session.tabs.push(Tab::new(tab_id, pane));
        session
    }

    pub fn next_pane_id(&mut self) -> PaneId {
        let id = PaneId(self.next_pane_id);
        self.next_pane_id += 1;
        id
    }

    pub fn next_tab_id(&mut self) -> TabId {
        let id = TabId(self.next_tab_id);
        self.next_tab_id += 1;
        id
    }

    /// Wrap a buffer in a pane with a fresh id
    pub fn new_pane(&mut self, buffer: Buffer) -> Pane {
        let id = self.next_pane_id();
        Pane::new(id, buffer)
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active_tab]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active_tab]
    }

    pub fn active_pane(&self) -> &Pane {
        self.active_tab().active()
    }

    pub fn active_pane_mut(&mut self) -> &mut Pane {
        self.active_tab_mut().active_mut()
    }

    pub fn active_buffer(&self) -> &Buffer {
        &self.active_pane().buffer
    }

    pub fn active_buffer_mut(&mut self) -> &mut Buffer {
        &mut self.active_pane_mut().buffer
    }

    /// Open `buffer` in a new tab after the current one and focus it
    pub fn open_tab(&mut self, buffer: Buffer) -> PaneId {
        let pane = self.new_pane(buffer);
        let pane_id = pane.id;
        let tab_id = self.next_tab_id();
        let insert_at = self.active_tab + 1;
        self.tabs.insert(insert_at, Tab::new(tab_id, pane));
        self.active_tab = insert_at;
        pane_id
    }

    /// Split the active tab. With no buffer the active pane is duplicated.
    pub fn split_active(
        &mut self,
        kind: SplitKind,
        buffer: Option<Buffer>,
    ) -> Result<PaneId, SplitError> {
        if self.active_tab().panes.len() >= MAX_PANES_PER_TAB {
            return Err(SplitError::MaxPanes);
        }
        let id = self.next_pane_id();
        let pane = match buffer {
            Some(buffer) => Pane::new(id, buffer),
            None => self.active_pane().duplicate(id),
        };
        self.active_tab_mut().split(kind, pane)?;
        Ok(id)
    }

    /// Close the active pane, then its tab if it became empty
    pub fn close_active_pane(&mut self) -> CloseOutcome {
        if self.active_tab().panes.len() > 1 {
            self.active_tab_mut().remove_active();
            self.active_tab_mut().refresh_name();
            return CloseOutcome::PaneClosed;
        }
        if self.tabs.len() == 1 {
            return CloseOutcome::LastPane;
        }
        self.tabs.remove(self.active_tab);
        if self.active_tab >= self.tabs.len() {
            self.active_tab = self.tabs.len() - 1;
        }
        CloseOutcome::TabClosed
    }

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.tabs.len();
    }

    pub fn prev_tab(&mut self) {
        self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
    }

    /// Focus the other pane of a split tab in the given direction.
    /// Returns false if there is no pane that way.
    pub fn focus_pane(&mut self, forward: bool, kind: SplitKind) -> bool {
        let tab = self.active_tab_mut();
        if tab.split != kind {
            return false;
        }
        let target = if forward { 1 } else { 0 };
        if tab.active_pane == target {
            return false;
        }
        tab.active_pane = target;
        true
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.tabs
            .iter_mut()
            .flat_map(|t| t.panes.iter_mut())
            .find(|p| p.id == id)
    }

    /// Tab owning the given pane
    pub fn tab_of_mut(&mut self, id: PaneId) -> Option<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|t| t.panes.iter().any(|p| p.id == id))
    }

    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.tabs.iter().flat_map(|t| t.panes.iter())
    }

    pub fn panes_mut(&mut self) -> impl Iterator<Item = &mut Pane> {
        self.tabs.iter_mut().flat_map(|t| t.panes.iter_mut())
    }
}
