//! Form field value objects

use crate::loader::LoadTicket;

/// Lifecycle of a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Unset,
    /// Options are loading (selectors only)
    Pending,
    Set,
}

/// Load state of a selector's options
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionsState {
    #[default]
    Idle,
    Loading(LoadTicket),
    Loaded,
    Failed(String),
}

/// Single-choice field whose options arrive asynchronously
#[derive(Debug, Clone)]
pub struct SelectField<T> {
    pub label: &'static str,
    pub placeholder: &'static str,
    options: Vec<T>,
    options_state: OptionsState,
    selected: Option<usize>,
    highlighted: usize,
}

impl<T: Clone + PartialEq> SelectField<T> {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            options: Vec::new(),
            options_state: OptionsState::Idle,
            selected: None,
            highlighted: 0,
        }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.options_state, OptionsState::Loading(_))
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.options_state {
            OptionsState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn status(&self) -> FieldStatus {
        if self.selected.is_some() {
            FieldStatus::Set
        } else if self.is_loading() {
            FieldStatus::Pending
        } else {
            FieldStatus::Unset
        }
    }

    /// Mark a load as in flight; only this ticket's result will be accepted
    pub fn begin_loading(&mut self, ticket: LoadTicket) {
        self.options_state = OptionsState::Loading(ticket);
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        self.options_state == OptionsState::Loading(ticket)
    }

    /// Install loaded options. Returns false (and changes nothing) for a stale ticket.
    ///
    /// A previous selection survives only if the new options still contain it.
    pub fn finish_loading(&mut self, ticket: LoadTicket, options: Vec<T>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let previous = self.selected().cloned();
        self.options = options;
        self.selected = previous.and_then(|p| self.options.iter().position(|o| *o == p));
        self.highlighted = self.selected.unwrap_or(0);
        self.options_state = OptionsState::Loaded;
        true
    }

    /// Record a failed load. Returns false for a stale ticket.
    pub fn fail_loading(&mut self, ticket: LoadTicket, reason: String) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.options.clear();
        self.selected = None;
        self.highlighted = 0;
        self.options_state = OptionsState::Failed(reason);
        true
    }

    /// Drop options and selection, back to Unset
    pub fn reset(&mut self) {
        self.options.clear();
        self.selected = None;
        self.highlighted = 0;
        self.options_state = OptionsState::Idle;
    }

    pub fn highlight_next(&mut self) {
        if !self.options.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.options.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        if self.highlighted == 0 {
            self.highlighted = self.options.len() - 1;
        } else {
            self.highlighted -= 1;
        }
    }

    /// Select the highlighted option
    pub fn select_highlighted(&mut self) -> Option<&T> {
        if self.highlighted < self.options.len() {
            self.selected = Some(self.highlighted);
        }
        self.selected()
    }
}

/// Free-text field with a character limit
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub placeholder: &'static str,
    value: String,
    max_chars: usize,
}

impl TextField {
    pub fn new(label: &'static str, placeholder: &'static str, max_chars: usize) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            max_chars,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Append a character; returns false when the field is already full
    pub fn push_char(&mut self, c: char) -> bool {
        if self.char_count() >= self.max_chars {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    /// Replace the value, truncating to the limit
    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.max_chars).collect();
    }
}

/// Open-ended multi-value entry; values are committed from a pending input
#[derive(Debug, Clone, Default)]
pub struct MultiValueField {
    pub label: &'static str,
    pub placeholder: &'static str,
    values: Vec<String>,
    input: String,
}

impl MultiValueField {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            ..Default::default()
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Delete from the pending input, or drop the last value when the input is empty
    pub fn backspace(&mut self) {
        if self.input.pop().is_none() {
            self.values.pop();
        }
    }

    /// Turn the pending input into a value. Blank input and duplicates are not added.
    pub fn commit_input(&mut self) -> bool {
        let value = self.input.trim().to_string();
        self.input.clear();
        if value.is_empty() || self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ticket(n: u64) -> LoadTicket {
        LoadTicket::from_raw(n)
    }

    fn loaded(options: &[&'static str]) -> SelectField<&'static str> {
        let mut field = SelectField::new("Field", "Choose");
        field.begin_loading(ticket(1));
        assert!(field.finish_loading(ticket(1), options.to_vec()));
        field
    }

    mod select_field {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_status_lifecycle() {
            let mut field = SelectField::new("Field", "Choose");
            assert_eq!(field.status(), FieldStatus::Unset);

            field.begin_loading(ticket(1));
            assert_eq!(field.status(), FieldStatus::Pending);

            field.finish_loading(ticket(1), vec!["a", "b"]);
            assert_eq!(field.status(), FieldStatus::Unset);

            field.select_highlighted();
            assert_eq!(field.status(), FieldStatus::Set);

            field.reset();
            assert_eq!(field.status(), FieldStatus::Unset);
        }

        #[test]
        fn test_stale_ticket_is_ignored() {
            let mut field: SelectField<&str> = SelectField::new("Field", "Choose");
            field.begin_loading(ticket(1));
            field.begin_loading(ticket(2));

            assert!(!field.finish_loading(ticket(1), vec!["old"]));
            assert!(field.options().is_empty());
            assert!(field.is_loading());

            assert!(field.finish_loading(ticket(2), vec!["new"]));
            assert_eq!(field.options(), &["new"]);
        }

        #[test]
        fn test_late_result_after_completion_is_ignored() {
            let mut field = loaded(&["a"]);
            assert!(!field.finish_loading(ticket(1), vec!["b"]));
            assert_eq!(field.options(), &["a"]);
        }

        #[test]
        fn test_reload_keeps_selection_still_offered() {
            let mut field = loaded(&["a", "b"]);
            field.highlight_next();
            field.select_highlighted();

            field.begin_loading(ticket(2));
            field.finish_loading(ticket(2), vec!["b", "c"]);
            assert_eq!(field.selected(), Some(&"b"));
            assert_eq!(field.highlighted(), 0);
        }

        #[test]
        fn test_reload_drops_selection_no_longer_offered() {
            let mut field = loaded(&["a", "b"]);
            field.highlight_next();
            field.select_highlighted();

            field.begin_loading(ticket(2));
            field.finish_loading(ticket(2), vec!["c"]);
            assert_eq!(field.selected(), None);
        }

        #[test]
        fn test_fail_loading_records_reason() {
            let mut field: SelectField<&str> = SelectField::new("Field", "Choose");
            field.begin_loading(ticket(3));
            assert!(field.fail_loading(ticket(3), "offline".to_string()));
            assert_eq!(field.load_error(), Some("offline"));
            assert_eq!(field.status(), FieldStatus::Unset);
        }

        #[test]
        fn test_highlight_wraps_both_ways() {
            let mut field = loaded(&["a", "b", "c"]);
            field.highlight_prev();
            assert_eq!(field.highlighted(), 2);
            field.highlight_next();
            assert_eq!(field.highlighted(), 0);
        }

        #[test]
        fn test_highlight_on_empty_is_noop() {
            let mut field: SelectField<&str> = SelectField::new("Field", "Choose");
            field.highlight_next();
            field.highlight_prev();
            assert_eq!(field.highlighted(), 0);
            assert!(field.select_highlighted().is_none());
        }

        #[test]
        fn test_select_highlighted_picks_current_option() {
            let mut field = loaded(&["a", "b", "c"]);
            field.highlight_next();
            field.highlight_next();
            assert_eq!(field.select_highlighted(), Some(&"c"));
            assert_eq!(field.selected_index(), Some(2));
        }
    }

    mod text_field {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_push_blocked_at_limit() {
            let mut field = TextField::new("Text", "", 3);
            assert!(field.push_char('a'));
            assert!(field.push_char('b'));
            assert!(field.push_char('c'));
            assert!(!field.push_char('d'));
            assert_eq!(field.value(), "abc");
        }

        #[test]
        fn test_limit_counts_characters_not_bytes() {
            let mut field = TextField::new("Text", "", 2);
            assert!(field.push_char('é'));
            assert!(field.push_char('ü'));
            assert!(!field.push_char('x'));
            assert_eq!(field.char_count(), 2);
        }

        #[test]
        fn test_set_value_truncates() {
            let mut field = TextField::new("Text", "", 4);
            field.set_value("abcdef");
            assert_eq!(field.value(), "abcd");
        }

        #[test]
        fn test_pop_char() {
            let mut field = TextField::new("Text", "", 10);
            field.set_value("ab");
            field.pop_char();
            assert_eq!(field.value(), "a");
            field.pop_char();
            field.pop_char();
            assert!(field.is_empty());
        }
    }

    mod multi_value_field {
        use super::*;
        use pretty_assertions::assert_eq;

        fn typed(field: &mut MultiValueField, text: &str) {
            for c in text.chars() {
                field.push_char(c);
            }
        }

        #[test]
        fn test_commit_adds_trimmed_value() {
            let mut field = MultiValueField::new("CC", "");
            typed(&mut field, " a@example.com ");
            assert!(field.commit_input());
            assert_eq!(field.values(), &["a@example.com".to_string()]);
            assert_eq!(field.input(), "");
        }

        #[test]
        fn test_commit_accepts_arbitrary_text() {
            let mut field = MultiValueField::new("CC", "");
            typed(&mut field, "not an email");
            assert!(field.commit_input());
        }

        #[test]
        fn test_commit_rejects_blank_and_duplicates() {
            let mut field = MultiValueField::new("CC", "");
            typed(&mut field, "   ");
            assert!(!field.commit_input());

            typed(&mut field, "x");
            assert!(field.commit_input());
            typed(&mut field, "x");
            assert!(!field.commit_input());
            assert_eq!(field.values().len(), 1);
        }

        #[test]
        fn test_backspace_on_empty_input_removes_last_value() {
            let mut field = MultiValueField::new("CC", "");
            typed(&mut field, "one");
            field.commit_input();
            typed(&mut field, "two");
            field.commit_input();
            typed(&mut field, "t");

            field.backspace();
            assert_eq!(field.values().len(), 2);
            field.backspace();
            assert_eq!(field.values(), &["one".to_string()]);
        }
    }
}
