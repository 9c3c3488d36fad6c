//! UI state - status line, command line input, overlays

/// UI state - status messages and transient inputs
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Message displayed in the status bar; the only sink for recoverable errors
    pub status_message: String,
    /// Text typed after `:` or into the commit message prompt
    pub input: String,
    /// First visible line of the help overlay
    pub help_scroll: usize,
    pub show_line_numbers: bool,
    /// A save is in flight
    pub is_saving: bool,
}

impl UiState {
    /// Create a new UI state with default settings
    pub fn new(show_line_numbers: bool) -> Self {
        Self {
            show_line_numbers,
            ..Self::default()
        }
    }

    /// Set the status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn clear_status(&mut self) {
        self.status_message.clear();
    }

    /// Take the pending input, leaving it empty
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }
}
