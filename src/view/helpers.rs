//! Shared helper functions for the view layer.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::Tab;

/// Get the display title for a tab, with a marker when any pane is unsaved.
pub fn tab_display_name(tab: &Tab) -> String {
    if tab.panes.iter().any(|p| p.buffer.modified) {
        format!("{} [+]", tab.name)
    } else {
        tab.name.clone()
    }
}

/// Cells taken by one character. Control characters show as one blank cell.
#[inline]
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        1
    } else {
        ch.width().unwrap_or(1)
    }
}

/// Screen columns before `column` (a character index) in `line`
pub fn column_to_cells(line: &str, column: usize) -> usize {
    line.chars().take(column).map(char_width).sum()
}

/// Truncate or pad `text` to exactly `width` cells
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        out.push(if ch.is_control() { ' ' } else { ch });
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Width of a string in cells
#[inline]
pub fn display_width(text: &str) -> usize {
    text.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn test_fit_wide_chars() {
        // A double-width char that does not fit is replaced by padding
        assert_eq!(fit("a日本", 4), "a日 ");
        assert_eq!(display_width(&fit("日本語", 5)), 5);
    }

    #[test]
    fn test_column_to_cells() {
        assert_eq!(column_to_cells("héllo", 2), 2);
        assert_eq!(column_to_cells("日本", 1), 2);
        assert_eq!(column_to_cells("ab", 10), 2);
    }

    #[test]
    fn test_fit_replaces_tabs() {
        assert_eq!(fit("a\tb", 3), "a b");
    }
}
