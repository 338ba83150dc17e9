//! Application state definitions

use super::forms::{ReportForm, SubmittedReport};
use std::collections::VecDeque;

/// Current phase of the reporting session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Editing,
    /// Terminal state for one report
    Submitted(SubmittedReport),
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    pub phase: Phase,
    pub form: ReportForm,

    // Modal error dialogs, oldest first
    errors: VecDeque<String>,

    // Status bar feedback
    pub status_message: Option<String>,
}

impl AppState {
    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Error currently shown, if any
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted(_))
    }

    /// Discard the current report and start from an empty form
    pub fn reset_form(&mut self) {
        self.phase = Phase::Editing;
        self.form = ReportForm::new();
    }
}
