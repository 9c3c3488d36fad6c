//! View module - draws the model into the terminal
//!
//! Rendering is a pure read of the model. Regions come from
//! `update::layout::compute`, the same pass that sized the panes, so the
//! cursor the reducer scrolled into view is the cursor drawn here.

pub mod helpers;

use std::io::{self, Stdout, Write};

use crossterm::cursor::{self, SetCursorStyle};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{queue, QueueableCommand};

use crate::lsp;
use crate::model::finder::FINDER_MAX_RESULTS;
use crate::model::{AppModel, Focus, Mode, Pane, Rect, TreePrompt, LINE_NUMBER_GUTTER_CHARS};
use crate::update::layout::{self, ScreenLayout};
use crate::update::{HELP_LINES, MENU_ENTRIES};

pub use helpers::{column_to_cells, fit, tab_display_name};

/// Rows of the completion popup
const COMPLETION_MAX_ROWS: usize = 8;
const POPUP_WIDTH: u16 = 32;

/// Text attribute for a run of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Reverse,
    Bold,
    Dim,
}

pub struct Renderer {
    stdout: Stdout,
    /// Clear the whole screen before the next frame
    full_redraw: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            full_redraw: true,
        }
    }

    /// Force a full clear, e.g. after a child process used the terminal
    pub fn invalidate(&mut self) {
        self.full_redraw = true;
    }

    pub fn draw(&mut self, model: &AppModel) -> io::Result<()> {
        let regions = layout::compute(model);
        self.stdout.queue(cursor::Hide)?;
        if std::mem::take(&mut self.full_redraw) {
            self.stdout.queue(Clear(ClearType::All))?;
        }

        self.draw_tab_bar(model, regions.tab_bar)?;
        if let Some(area) = regions.sidebar {
            self.draw_sidebar(model, area)?;
        }
        for pane in &model.session.active_tab().panes {
            self.draw_pane(model, pane)?;
        }
        if let Some(area) = regions.vcs {
            self.draw_vcs_panel(model, area)?;
        }
        self.draw_status_line(model, regions.status)?;
        self.draw_command_line(model, regions.command_line)?;

        match model.mode {
            Mode::FuzzyFind => self.draw_finder(model, regions.editor)?,
            Mode::WhichKey => self.draw_which_key(regions.editor)?,
            Mode::Help => self.draw_help(model, regions.editor)?,
            Mode::Insert if model.completion.visible => self.draw_completion(model)?,
            _ => {}
        }

        self.place_cursor(model, &regions)?;
        self.stdout.flush()
    }

    /// Print `text` fitted to `width` cells at (x, y)
    fn put(&mut self, x: u16, y: u16, width: u16, text: &str, style: Style) -> io::Result<()> {
        if width == 0 {
            return Ok(());
        }
        let attr = match style {
            Style::Plain => Attribute::Reset,
            Style::Reverse => Attribute::Reverse,
            Style::Bold => Attribute::Bold,
            Style::Dim => Attribute::Dim,
        };
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            SetAttribute(attr),
            Print(fit(text, usize::from(width))),
            SetAttribute(Attribute::Reset)
        )
    }

    fn draw_tab_bar(&mut self, model: &AppModel, area: Rect) -> io::Result<()> {
        let mut x = area.x;
        let end = area.x + area.width;
        for (idx, tab) in model.session.tabs.iter().enumerate() {
            let label = format!(" {} ", tab_display_name(tab));
            let width = (helpers::display_width(&label) as u16).min(end.saturating_sub(x));
            let style = if idx == model.session.active_tab {
                Style::Reverse
            } else {
                Style::Plain
            };
            self.put(x, area.y, width, &label, style)?;
            x += width;
        }
        self.put(x, area.y, end.saturating_sub(x), "", Style::Plain)
    }

    fn draw_sidebar(&mut self, model: &AppModel, area: Rect) -> io::Result<()> {
        let tree = &model.file_tree;
        let inner = area.width.saturating_sub(1);
        let title = tree
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| tree.root.display().to_string());
        let title = if tree.loading {
            format!("{} ...", title)
        } else {
            title
        };
        self.put(area.x, area.y, inner, &title, Style::Bold)?;

        let rows = usize::from(area.height.saturating_sub(1));
        let start = tree.selected.saturating_sub(rows.saturating_sub(1));
        for row in 0..rows {
            let y = area.y + 1 + row as u16;
            let (text, style) = match tree.entries.get(start + row) {
                Some(entry) => {
                    let marker = if entry.is_dir { "+ " } else { "  " };
                    let suffix = if entry.is_dir { "/" } else { "" };
                    let style = if start + row == tree.selected && model.focus == Focus::FileTree {
                        Style::Reverse
                    } else if start + row == tree.selected {
                        Style::Bold
                    } else {
                        Style::Plain
                    };
                    (format!("{}{}{}", marker, entry.name, suffix), style)
                }
                None => (String::new(), Style::Plain),
            };
            self.put(area.x, y, inner, &text, style)?;
        }

        for y in area.y..area.y + area.height {
            queue!(self.stdout, cursor::MoveTo(area.x + inner, y), Print("│"))?;
        }
        Ok(())
    }

    fn gutter_width(model: &AppModel) -> u16 {
        if model.ui.show_line_numbers {
            LINE_NUMBER_GUTTER_CHARS
        } else {
            0
        }
    }

    fn draw_pane(&mut self, model: &AppModel, pane: &Pane) -> io::Result<()> {
        let area = pane.area;
        let gutter = Self::gutter_width(model).min(area.width);
        let text_width = area.width - gutter;
        let is_active = pane.id == model.session.active_pane().id;
        let suggestion = model
            .prediction
            .suggestion
            .as_ref()
            .filter(|_| is_active && model.mode == Mode::Insert);

        for row in 0..area.height {
            let y = area.y + row;
            let line_idx = pane.scroll + usize::from(row);
            let Some(line) = pane.buffer.line(line_idx) else {
                self.put(area.x, y, gutter, "", Style::Plain)?;
                queue!(self.stdout, SetForegroundColor(Color::DarkGrey))?;
                self.put(area.x + gutter, y, text_width, "~", Style::Plain)?;
                self.stdout.queue(ResetColor)?;
                continue;
            };
            if gutter > 0 {
                let number = format!("{:>width$} ", line_idx + 1, width = usize::from(gutter) - 1);
                self.put(area.x, y, gutter, &number, Style::Dim)?;
            }

            match suggestion.filter(|_| line_idx == pane.buffer.cursor_line) {
                Some(s) => {
                    let used = helpers::display_width(line).min(usize::from(text_width)) as u16;
                    self.put(area.x + gutter, y, used, line, Style::Plain)?;
                    self.put(area.x + gutter + used, y, text_width - used, &s.text, Style::Dim)?;
                }
                None => self.put(area.x + gutter, y, text_width, line, Style::Plain)?,
            }
        }
        Ok(())
    }

    fn draw_vcs_panel(&mut self, model: &AppModel, area: Rect) -> io::Result<()> {
        let vcs = &model.vcs;
        let header = if vcs.loading {
            "Git: loading...".to_string()
        } else if let Some(summary) = vcs.summary() {
            format!("Git: {}  (Space stage, c commit, P push, Enter diff)", summary)
        } else {
            "Not a git repository (i to init)".to_string()
        };
        let header_style = if model.focus == Focus::Vcs {
            Style::Reverse
        } else {
            Style::Bold
        };
        self.put(area.x, area.y, area.width, &header, header_style)?;

        let rows = usize::from(area.height.saturating_sub(1));
        let start = vcs.selected.saturating_sub(rows.saturating_sub(1));
        for row in 0..rows {
            let y = area.y + 1 + row as u16;
            let idx = start + row;
            let (text, style) = match vcs.snapshot.entries.get(idx) {
                Some(entry) => {
                    let staged = if entry.staged { "[S]" } else { "[ ]" };
                    let style = if idx == vcs.selected && model.focus == Focus::Vcs {
                        Style::Reverse
                    } else {
                        Style::Plain
                    };
                    (
                        format!("{} {} {}", staged, entry.status.marker(), entry.path),
                        style,
                    )
                }
                None => (String::new(), Style::Plain),
            };
            self.put(area.x, y, area.width, &text, style)?;
        }
        Ok(())
    }

    fn draw_status_line(&mut self, model: &AppModel, area: Rect) -> io::Result<()> {
        let buffer = model.buffer();
        let mut parts = vec![
            format!(" {} ", model.mode),
            model.session.active_tab().name.clone(),
        ];
        if buffer.modified {
            parts.push("[+]".into());
        }
        if model.ui.is_saving {
            parts.push("saving".into());
        }
        parts.push(format!(
            "Ln {}, Col {}",
            buffer.cursor_line + 1,
            buffer.cursor_column + 1
        ));
        if let Some(uri) = buffer.path.as_deref().and_then(lsp::path_to_uri) {
            let count = model.lsp.diagnostics(&uri).len();
            if count > 0 {
                parts.push(format!("{} diagnostics", count));
            }
        }
        if let Some(summary) = model.vcs.summary() {
            parts.push(summary);
        }
        if model.plugin.load_error().is_some() {
            parts.push("plugin error".into());
        }
        self.put(area.x, area.y, area.width, &parts.join(" | "), Style::Reverse)
    }

    fn draw_command_line(&mut self, model: &AppModel, area: Rect) -> io::Result<()> {
        let text = match (model.mode, &model.file_tree.prompt) {
            (Mode::Command, _) => format!(":{}", model.ui.input),
            (Mode::CommitMessage, _) => format!("Commit message: {}", model.ui.input),
            (_, Some(TreePrompt::Create { input })) => format!("New: {}", input),
            (_, Some(TreePrompt::Rename { input, .. })) => format!("Rename: {}", input),
            _ => model.ui.status_message.clone(),
        };
        self.put(area.x, area.y, area.width, &text, Style::Plain)
    }

    /// Centered box inside `area`
    fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    fn draw_finder(&mut self, model: &AppModel, editor: Rect) -> io::Result<()> {
        let Some(finder) = &model.finder else {
            return Ok(());
        };
        let rows = FINDER_MAX_RESULTS as u16 + 1;
        let area = Self::popup(editor, editor.width.saturating_sub(8).max(20), rows);
        let count = if finder.scanning {
            "scanning".to_string()
        } else {
            format!("{}/{}", finder.matches.len(), finder.files.len())
        };
        self.put(
            area.x,
            area.y,
            area.width,
            &format!("Find: {}  [{}]", finder.query, count),
            Style::Reverse,
        )?;
        let start = finder
            .selected
            .saturating_sub(FINDER_MAX_RESULTS.saturating_sub(1));
        for row in 0..usize::from(area.height.saturating_sub(1)) {
            let idx = start + row;
            let text = finder
                .matches
                .get(idx)
                .and_then(|&file| finder.files.get(file))
                .map(String::as_str)
                .unwrap_or("");
            let style = if idx == finder.selected && !text.is_empty() {
                Style::Reverse
            } else {
                Style::Plain
            };
            self.put(area.x, area.y + 1 + row as u16, area.width, &format!(" {}", text), style)?;
        }
        Ok(())
    }

    fn draw_which_key(&mut self, editor: Rect) -> io::Result<()> {
        let height = MENU_ENTRIES.len() as u16 + 1;
        let width = 24u16.min(editor.width);
        let area = Rect::new(
            editor.x + editor.width - width,
            editor.y + editor.height.saturating_sub(height),
            width,
            height.min(editor.height),
        );
        self.put(area.x, area.y, area.width, " Menu", Style::Reverse)?;
        for (row, (key, label)) in MENU_ENTRIES
            .iter()
            .take(usize::from(area.height.saturating_sub(1)))
            .enumerate()
        {
            let line = format!(" {}  {}", key, label);
            self.put(area.x, area.y + 1 + row as u16, area.width, &line, Style::Plain)?;
        }
        Ok(())
    }

    fn draw_help(&mut self, model: &AppModel, editor: Rect) -> io::Result<()> {
        let area = Self::popup(editor, 56, editor.height);
        self.put(area.x, area.y, area.width, " Help", Style::Reverse)?;
        for row in 0..area.height.saturating_sub(1) {
            let line = HELP_LINES
                .get(model.ui.help_scroll + usize::from(row))
                .copied()
                .unwrap_or("");
            self.put(area.x, area.y + 1 + row, area.width, line, Style::Plain)?;
        }
        Ok(())
    }

    fn draw_completion(&mut self, model: &AppModel) -> io::Result<()> {
        let Some((x, y)) = cursor_cell(model) else {
            return Ok(());
        };
        let (cols, _) = model.terminal_size;
        let editor = layout::compute(model).editor;
        let completion = &model.completion;
        let rows = completion.items.len().min(COMPLETION_MAX_ROWS) as u16;
        let below = y + 1 + rows <= editor.y + editor.height;
        let top = if below { y + 1 } else { y.saturating_sub(rows) };
        let width = POPUP_WIDTH.min(cols);
        let left = x.min(cols - width);

        let start = completion
            .selected
            .saturating_sub(COMPLETION_MAX_ROWS.saturating_sub(1));
        for row in 0..rows {
            let idx = start + usize::from(row);
            let Some(item) = completion.items.get(idx) else {
                break;
            };
            let style = if idx == completion.selected {
                Style::Reverse
            } else {
                Style::Bold
            };
            self.put(left, top + row, width, &format!(" {}", item.label), style)?;
        }
        Ok(())
    }

    fn place_cursor(&mut self, model: &AppModel, regions: &ScreenLayout) -> io::Result<()> {
        let position = match model.mode {
            Mode::Command => {
                let x = 1 + helpers::display_width(&model.ui.input) as u16;
                Some((x.min(regions.command_line.width), regions.command_line.y))
            }
            Mode::CommitMessage => {
                let x = "Commit message: ".len() + helpers::display_width(&model.ui.input);
                Some((x as u16, regions.command_line.y))
            }
            Mode::Normal | Mode::Insert if model.focus == Focus::Editor => cursor_cell(model),
            _ => None,
        };
        let Some((x, y)) = position else {
            return Ok(());
        };
        let shape = if model.mode == Mode::Insert {
            SetCursorStyle::SteadyBar
        } else {
            SetCursorStyle::SteadyBlock
        };
        queue!(self.stdout, cursor::MoveTo(x, y), shape, cursor::Show)
    }
}

/// Screen cell of the active buffer's cursor, if it is inside its pane
fn cursor_cell(model: &AppModel) -> Option<(u16, u16)> {
    let pane = model.session.active_pane();
    let buffer = &pane.buffer;
    let row = buffer.cursor_line.checked_sub(pane.scroll)?;
    if row >= usize::from(pane.area.height) {
        return None;
    }
    let gutter = if model.ui.show_line_numbers {
        LINE_NUMBER_GUTTER_CHARS
    } else {
        0
    };
    let column = column_to_cells(buffer.current_line(), buffer.cursor_column);
    let x = usize::from(pane.area.x + gutter) + column;
    let max_x = usize::from(pane.area.x + pane.area.width).saturating_sub(1);
    Some((x.min(max_x) as u16, pane.area.y + row as u16))
}
