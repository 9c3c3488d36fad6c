//! Completion popup and inline prediction state

use crate::completion::CompletionItem;

#[derive(Debug, Clone, Default)]
pub struct CompletionState {
    pub enabled: bool,
    pub visible: bool,
    pub items: Vec<CompletionItem>,
    pub selected: usize,
    /// Text before the cursor the items were computed for
    pub prefix: String,
}

impl CompletionState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn show(&mut self, prefix: String, items: Vec<CompletionItem>) {
        self.visible = !items.is_empty();
        self.items = items;
        self.selected = 0;
        self.prefix = prefix;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.items.clear();
        self.selected = 0;
    }

    pub fn selected_item(&self) -> Option<&CompletionItem> {
        if !self.visible {
            return None;
        }
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }
}

/// Debounced single-line prediction
///
/// Every insert-mode keystroke bumps `generation`; a debounce timer or a
/// prediction result carrying an older generation is dropped.
#[derive(Debug, Clone, Default)]
pub struct PredictionState {
    pub generation: u64,
    /// Suggested continuation of the current line, shown as ghost text
    pub suggestion: Option<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub generation: u64,
}

impl PredictionState {
    /// Invalidate anything in flight and clear the visible suggestion
    pub fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.suggestion = None;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Store a prediction if it belongs to the latest generation
    pub fn offer(&mut self, generation: u64, text: String) -> bool {
        if !self.is_current(generation) || text.is_empty() {
            return false;
        }
        self.suggestion = Some(Suggestion { text, generation });
        true
    }

    pub fn take(&mut self) -> Option<String> {
        self.suggestion.take().map(|s| s.text)
    }
}
