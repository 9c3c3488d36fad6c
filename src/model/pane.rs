//! A pane is a scrolled viewport onto the buffer it owns

use super::buffer::Buffer;
use super::session::PaneId;

/// Screen rectangle in terminal cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Split into left/right halves
    pub fn split_columns(self) -> (Rect, Rect) {
        let left = self.width / 2;
        (
            Rect::new(self.x, self.y, left, self.height),
            Rect::new(self.x + left, self.y, self.width - left, self.height),
        )
    }

    /// Split into top/bottom halves
    pub fn split_rows(self) -> (Rect, Rect) {
        let top = self.height / 2;
        (
            Rect::new(self.x, self.y, self.width, top),
            Rect::new(self.x, self.y + top, self.width, self.height - top),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Pane {
    pub id: PaneId,
    pub buffer: Buffer,
    /// First visible line
    pub scroll: usize,
    /// Area assigned by the last layout pass
    pub area: Rect,
}

impl Pane {
    pub fn new(id: PaneId, buffer: Buffer) -> Self {
        Self {
            id,
            buffer,
            scroll: 0,
            area: Rect::default(),
        }
    }

    /// Number of text rows the pane can show (at least one)
    pub fn visible_height(&self) -> usize {
        usize::from(self.area.height).max(1)
    }

    /// Keep `scroll <= cursor_line <= scroll + visible_height - 1`
    pub fn ensure_cursor_visible(&mut self) {
        self.buffer.clamp_cursor();
        let cursor = self.buffer.cursor_line;
        let height = self.visible_height();
        if cursor < self.scroll {
            self.scroll = cursor;
        } else if cursor >= self.scroll + height {
            self.scroll = cursor + 1 - height;
        }
    }

    /// Copy of this pane's content under a new id; never shares the buffer
    pub fn duplicate(&self, id: PaneId) -> Self {
        Self {
            id,
            buffer: self.buffer.clone(),
            scroll: self.scroll,
            area: self.area,
        }
    }

    /// Display name: file name, or `untitled`
    pub fn title(&self) -> String {
        self.buffer
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }
}
