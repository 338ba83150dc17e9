//! Application state and core logic

use crate::catalog::Department;
use crate::loader::{LoadEvent, Loader};
use crate::provider::ReportDataProvider;
use crate::state::{AppState, FieldId, LoadApplied, Phase};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Dispatches provider calls off the UI loop
    loader: Loader,
    /// Completed loads waiting to be applied
    events: mpsc::UnboundedReceiver<LoadEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App and start loading departments.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(provider: Arc<dyn ReportDataProvider>) -> Self {
        let (loader, events) = Loader::new(provider);
        let mut app = Self {
            state: AppState::default(),
            loader,
            events,
            quit: false,
        };
        app.load_departments();
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    fn load_departments(&mut self) {
        let ticket = self.loader.request_departments();
        self.state.form.begin_department_load(ticket);
    }

    fn load_issue_types(&mut self, department: Department) {
        let ticket = self.loader.request_issue_types(department);
        self.state.form.begin_issue_type_load(ticket);
    }

    /// Apply every load that has completed since the last call
    pub fn poll_loads(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_load_event(event);
        }
    }

    pub fn apply_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Departments { ticket, result } => {
                let applied = self.state.form.apply_departments(ticket, result);
                self.report_load("departments", applied);
            }
            LoadEvent::IssueTypes {
                ticket,
                department,
                result,
            } => {
                let applied = self
                    .state
                    .form
                    .apply_issue_types(ticket, &department, result);
                self.report_load(&format!("issue types for {department}"), applied);
            }
        }
    }

    fn report_load(&mut self, what: &str, applied: LoadApplied) {
        match applied {
            LoadApplied::Applied => tracing::debug!("loaded {what}"),
            LoadApplied::Stale => tracing::debug!("discarded stale {what}"),
            LoadApplied::Failed(err) => {
                tracing::warn!("failed to load {what}: {err}");
                self.push_error(format!("Failed to load {what}: {err}"));
            }
        }
    }

    /// Re-issue any load whose last attempt failed
    pub fn retry_failed_loads(&mut self) {
        if self.state.form.department.load_error().is_some() {
            self.load_departments();
        }
        if self.state.form.issue_type.load_error().is_some() {
            if let Some(department) = self.state.form.department.selected().cloned() {
                self.load_issue_types(department);
            }
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Quit works even behind the error dialog
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        // Error dialog is modal
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.phase {
            Phase::Editing => self.handle_form_key(key),
            Phase::Submitted(_) => self.handle_submitted_key(key),
        }

        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.state.form.next_field(),
            KeyCode::BackTab => self.state.form.prev_field(),
            // Ctrl+S submits from anywhere
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Char('r') if key.modifiers.contains(crate::platform::COMMAND_MODIFIER) => {
                self.retry_failed_loads()
            }
            _ => match self.state.form.active_field {
                FieldId::Department => self.handle_department_key(key),
                FieldId::IssueType => self.handle_issue_type_key(key),
                FieldId::Description => self.handle_description_key(key),
                FieldId::Cc => self.handle_cc_key(key),
                FieldId::Submit => {
                    if key.code == KeyCode::Enter {
                        self.submit();
                    }
                }
            },
        }
    }

    fn handle_department_key(&mut self, key: KeyEvent) {
        let field = &mut self.state.form.department;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => field.highlight_prev(),
            KeyCode::Down | KeyCode::Char('j') => field.highlight_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(department) = self.state.form.select_department() {
                    tracing::debug!(department = %department, "department changed");
                    self.load_issue_types(department);
                }
            }
            _ => {}
        }
    }

    fn handle_issue_type_key(&mut self, key: KeyEvent) {
        if !self.state.form.is_issue_type_enabled() {
            return;
        }
        let field = &mut self.state.form.issue_type;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => field.highlight_prev(),
            KeyCode::Down | KeyCode::Char('j') => field.highlight_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.state.form.select_issue_type();
            }
            _ => {}
        }
    }

    fn handle_description_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.form.input_char(c)
            }
            KeyCode::Backspace => self.state.form.backspace(),
            KeyCode::Enter => self.state.form.input_char('\n'),
            _ => {}
        }
    }

    fn handle_cc_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.form;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.input_char(c)
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                form.cc.commit_input();
            }
            KeyCode::Delete if form.cc.input().is_empty() => form.cc.clear(),
            _ => {}
        }
    }

    fn handle_submitted_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('n')) {
            self.start_new_report();
        }
    }

    /// Validate and submit. Inert beyond revealing errors when the form is invalid.
    pub fn submit(&mut self) {
        match self.state.form.submit() {
            Ok(report) => {
                match serde_json::to_string(&report) {
                    Ok(json) => tracing::info!(report = %json, "report submitted"),
                    Err(err) => tracing::warn!("failed to serialize report: {err}"),
                }
                self.state.status_message = Some("Report submitted".to_string());
                self.state.phase = Phase::Submitted(report);
            }
            Err(errors) => {
                tracing::debug!(count = errors.len(), "submit blocked by validation");
            }
        }
    }

    /// Discard the submitted report and start over with fresh data
    pub fn start_new_report(&mut self) {
        self.state.reset_form();
        self.load_departments();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, IssueTypeOption};
    use crate::provider::{CatalogProvider, MockReportDataProvider, ProviderError};
    use crate::state::FieldStatus;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn command(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), crate::platform::COMMAND_MODIFIER)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn catalog_app() -> App {
        let provider = CatalogProvider::new(Catalog::builtin().unwrap(), Duration::ZERO);
        App::new(Arc::new(provider))
    }

    /// Wait for `count` loads to complete and apply them
    async fn settle(app: &mut App, count: usize) {
        for _ in 0..count {
            let event = app.events.recv().await.expect("loader channel closed");
            app.apply_load_event(event);
        }
    }

    fn issue_type_ids(app: &App) -> Vec<String> {
        app.state
            .form
            .issue_type
            .options()
            .iter()
            .map(|o| o.issue_type.id().to_string())
            .collect()
    }

    mod flow {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_departments_pending_until_loaded() {
            let mut app = catalog_app();
            assert!(app.state.form.department.is_loading());

            settle(&mut app, 1).await;
            assert!(!app.state.form.department.is_loading());
            assert_eq!(app.state.form.department.options().len(), 2);
        }

        #[tokio::test]
        async fn test_dev_error_scenario() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;

            press(&mut app, KeyCode::Enter); // DEV
            assert_eq!(app.state.form.issue_type.status(), FieldStatus::Pending);
            settle(&mut app, 1).await;
            assert_eq!(issue_type_ids(&app), vec!["ERROR", "WARNING", "INFO"]);

            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Enter); // ERROR
            assert_eq!(app.state.form.description.value(), "My error is:");
            assert!(app.state.form.is_valid());

            app.handle_key(ctrl('s')).unwrap();
            assert!(app.state.is_submitted());
        }

        #[tokio::test]
        async fn test_qa_via_keyboard_navigation() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;

            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Enter);
            settle(&mut app, 1).await;
            assert_eq!(issue_type_ids(&app), vec!["UI", "FUNCTIONAL"]);
        }

        #[tokio::test]
        async fn test_issue_type_keys_ignored_without_department() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;

            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Enter);
            assert!(app.state.form.issue_type.selected().is_none());
        }

        #[tokio::test]
        async fn test_submit_button_inert_when_invalid() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;

            app.state.form.focus(FieldId::Submit);
            press(&mut app, KeyCode::Enter);
            assert!(!app.state.is_submitted());
            assert!(app
                .state
                .form
                .visible_error(FieldId::Department)
                .is_some());
        }

        #[tokio::test]
        async fn test_description_typing_and_newline() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;
            app.state.form.focus(FieldId::Description);

            type_text(&mut app, "ab");
            press(&mut app, KeyCode::Enter);
            type_text(&mut app, "c");
            press(&mut app, KeyCode::Backspace);
            assert_eq!(app.state.form.description.value(), "ab\n");
        }

        #[tokio::test]
        async fn test_cc_entry_keys() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;
            app.state.form.focus(FieldId::Cc);

            type_text(&mut app, "a@x.io");
            press(&mut app, KeyCode::Enter);
            type_text(&mut app, "b@x.io");
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.state.form.cc.values().len(), 2);

            press(&mut app, KeyCode::Backspace);
            assert_eq!(app.state.form.cc.values(), &["a@x.io".to_string()]);

            press(&mut app, KeyCode::Delete);
            assert!(app.state.form.cc.values().is_empty());
        }

        #[tokio::test]
        async fn test_new_report_after_submission() {
            let mut app = catalog_app();
            settle(&mut app, 1).await;
            press(&mut app, KeyCode::Enter);
            settle(&mut app, 1).await;
            press(&mut app, KeyCode::Tab);
            press(&mut app, KeyCode::Enter);
            app.submit();
            assert!(app.state.is_submitted());

            press(&mut app, KeyCode::Char('n'));
            assert!(!app.state.is_submitted());
            assert!(app.state.form.department.is_loading());
            assert!(app.state.form.description.is_empty());

            settle(&mut app, 1).await;
            assert_eq!(app.state.form.department.options().len(), 2);
        }

        #[tokio::test]
        async fn test_ctrl_q_quits() {
            let mut app = catalog_app();
            assert!(!app.should_quit());
            app.handle_key(ctrl('q')).unwrap();
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_ctrl_q_quits_while_error_dialog_open() {
            let mut app = catalog_app();
            app.push_error("Failed to load departments");
            app.handle_key(ctrl('q')).unwrap();
            assert!(app.should_quit());
            assert!(app.state.has_errors());
        }
    }

    mod races {
        use super::*;
        use pretty_assertions::assert_eq;

        /// Serves DEV slowly and everything else quickly
        struct SlowDevProvider {
            catalog: Catalog,
        }

        #[async_trait]
        impl ReportDataProvider for SlowDevProvider {
            async fn load_departments(&self) -> Result<Vec<Department>, ProviderError> {
                Ok(self.catalog.departments())
            }

            async fn load_issue_types(
                &self,
                department: &Department,
            ) -> Result<Vec<IssueTypeOption>, ProviderError> {
                let delay = if department.id() == "DEV" { 500 } else { 10 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(self
                    .catalog
                    .issue_types(department)
                    .map(<[IssueTypeOption]>::to_vec)
                    .unwrap_or_default())
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_slow_result_for_previous_department_is_discarded() {
            let provider = SlowDevProvider {
                catalog: Catalog::builtin().unwrap(),
            };
            let mut app = App::new(Arc::new(provider));
            settle(&mut app, 1).await;

            press(&mut app, KeyCode::Enter); // DEV, slow
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Enter); // QA, fast

            // QA resolves first, DEV afterwards
            settle(&mut app, 2).await;
            assert_eq!(
                app.state.form.department.selected(),
                Some(&Department::new("QA"))
            );
            assert_eq!(issue_type_ids(&app), vec!["UI", "FUNCTIONAL"]);
            assert!(!app.state.has_errors());
        }
    }

    mod failures {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_department_failure_shows_error_and_retry_recovers() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let mut mock = MockReportDataProvider::new();
            mock.expect_load_departments().times(2).returning(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ProviderError::Unavailable("connection refused".to_string()))
                } else {
                    Ok(vec![Department::new("DEV")])
                }
            });

            let mut app = App::new(Arc::new(mock));
            settle(&mut app, 1).await;
            assert!(app.state.has_errors());
            assert!(app
                .state
                .current_error()
                .unwrap()
                .contains("connection refused"));
            assert!(app.state.form.department.load_error().is_some());

            // Keys are swallowed by the modal until dismissed
            app.handle_key(command('r')).unwrap();
            assert!(app.state.has_errors());
            press(&mut app, KeyCode::Esc);
            assert!(!app.state.has_errors());

            app.handle_key(command('r')).unwrap();
            assert!(app.state.form.department.is_loading());
            settle(&mut app, 1).await;
            assert_eq!(
                app.state.form.department.options(),
                &[Department::new("DEV")]
            );
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_issue_type_failure_leaves_selector_unset() {
            let mut mock = MockReportDataProvider::new();
            mock.expect_load_departments()
                .returning(|| Ok(vec![Department::new("DEV")]));
            mock.expect_load_issue_types()
                .returning(|_| Err(ProviderError::Unavailable("timeout".to_string())));

            let mut app = App::new(Arc::new(mock));
            settle(&mut app, 1).await;
            press(&mut app, KeyCode::Enter);
            settle(&mut app, 1).await;

            assert!(app.state.has_errors());
            assert_eq!(app.state.form.issue_type.status(), FieldStatus::Unset);
            assert!(app.state.form.issue_type.load_error().is_some());
        }

        #[tokio::test]
        async fn test_retry_without_failures_issues_no_loads() {
            let mut mock = MockReportDataProvider::new();
            mock.expect_load_departments()
                .times(1)
                .returning(|| Ok(vec![Department::new("QA")]));

            let mut app = App::new(Arc::new(mock));
            settle(&mut app, 1).await;
            app.retry_failed_loads();
            assert!(!app.state.form.department.is_loading());
        }
    }
}
