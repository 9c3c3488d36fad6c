//! Screen layout pass
//!
//! Runs after every update: assigns each pane its rectangle and pulls the
//! scroll offset back over the cursor. The renderer draws into the same
//! rectangles, so there is one source of truth for where things are.

use crate::model::file_tree::SIDEBAR_WIDTH;
use crate::model::vcs::VCS_PANEL_HEIGHT;
use crate::model::{AppModel, Rect, SplitKind};

/// Rows taken by the tab bar
const TAB_BAR_HEIGHT: u16 = 1;
/// Status line plus command line
const FOOTER_HEIGHT: u16 = 2;

/// Rectangles for every screen region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub tab_bar: Rect,
    pub sidebar: Option<Rect>,
    /// Area shared by the panes of the active tab
    pub editor: Rect,
    pub vcs: Option<Rect>,
    pub status: Rect,
    pub command_line: Rect,
}

/// Compute regions for the current terminal size and visible panels
pub fn compute(model: &AppModel) -> ScreenLayout {
    let (cols, rows) = model.terminal_size;
    let body_height = rows.saturating_sub(TAB_BAR_HEIGHT + FOOTER_HEIGHT);
    let body = Rect::new(0, TAB_BAR_HEIGHT, cols, body_height);

    let (sidebar, right) = if model.file_tree.visible && cols > SIDEBAR_WIDTH {
        (
            Some(Rect::new(body.x, body.y, SIDEBAR_WIDTH, body.height)),
            Rect::new(body.x + SIDEBAR_WIDTH, body.y, cols - SIDEBAR_WIDTH, body.height),
        )
    } else {
        (None, body)
    };

    // The panel never takes the last editor row
    let (editor, vcs) = if model.vcs.visible && right.height > VCS_PANEL_HEIGHT {
        let editor_height = right.height - VCS_PANEL_HEIGHT;
        (
            Rect::new(right.x, right.y, right.width, editor_height),
            Some(Rect::new(
                right.x,
                right.y + editor_height,
                right.width,
                VCS_PANEL_HEIGHT,
            )),
        )
    } else {
        (right, None)
    };

    ScreenLayout {
        tab_bar: Rect::new(0, 0, cols, TAB_BAR_HEIGHT.min(rows)),
        sidebar,
        editor,
        vcs,
        status: Rect::new(0, rows.saturating_sub(2), cols, 1),
        command_line: Rect::new(0, rows.saturating_sub(1), cols, 1),
    }
}

/// Assign pane rectangles for every tab and keep each cursor in view
pub fn sync_layout(model: &mut AppModel) {
    let editor = compute(model).editor;
    for tab in &mut model.session.tabs {
        let areas: Vec<Rect> = match (tab.split, tab.panes.len()) {
            (SplitKind::Vertical, 2) => {
                let (left, right) = editor.split_columns();
                vec![left, right]
            }
            (SplitKind::Horizontal, 2) => {
                let (top, bottom) = editor.split_rows();
                vec![top, bottom]
            }
            _ => vec![editor],
        };
        for (pane, area) in tab.panes.iter_mut().zip(areas) {
            pane.area = area;
            pane.ensure_cursor_visible();
        }
    }
}
