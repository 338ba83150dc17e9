//! Issue report form: field cascade and validation

use super::field::{FieldStatus, MultiValueField, SelectField, TextField};
use crate::catalog::{Department, IssueType, IssueTypeOption, DESCRIPTION_MAX_CHARS};
use crate::loader::LoadTicket;
use crate::provider::ProviderError;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Focusable positions in the form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Department,
    IssueType,
    Description,
    Cc,
    Submit,
}

impl FieldId {
    pub const ORDER: [FieldId; 5] = [
        FieldId::Department,
        FieldId::IssueType,
        FieldId::Description,
        FieldId::Cc,
        FieldId::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let index = self.index();
        if index == 0 {
            Self::ORDER[Self::ORDER.len() - 1]
        } else {
            Self::ORDER[index - 1]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required(FieldId),
}

impl ValidationError {
    pub fn field(&self) -> FieldId {
        match self {
            Self::Required(field) => *field,
        }
    }
}

/// Outcome of feeding a load result into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadApplied {
    Applied,
    /// Result belongs to a superseded request or a department no longer selected
    Stale,
    Failed(ProviderError),
}

/// A report that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedReport {
    pub department: Department,
    pub issue_type: IssueType,
    pub description: String,
    pub cc: Vec<String>,
}

/// Report form state
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub department: SelectField<Department>,
    pub issue_type: SelectField<IssueTypeOption>,
    pub description: TextField,
    pub cc: MultiValueField,
    pub active_field: FieldId,
    /// Department the current issue-type options were loaded for
    issue_types_for: Option<Department>,
    touched: HashSet<FieldId>,
    submit_attempted: bool,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportForm {
    pub fn new() -> Self {
        Self {
            department: SelectField::new("Department", "Choose department"),
            issue_type: SelectField::new("Issue type", "Choose issue type"),
            description: TextField::new(
                "Description",
                "Enter your description",
                DESCRIPTION_MAX_CHARS,
            ),
            cc: MultiValueField::new("CC", "Enter your emails"),
            active_field: FieldId::Department,
            issue_types_for: None,
            touched: HashSet::new(),
            submit_attempted: false,
        }
    }

    // Focus

    /// Move focus to the next field; the field being left counts as touched
    pub fn next_field(&mut self) {
        self.focus(self.active_field.next());
    }

    pub fn prev_field(&mut self) {
        self.focus(self.active_field.prev());
    }

    pub fn focus(&mut self, field: FieldId) {
        if field != self.active_field {
            self.touched.insert(self.active_field);
            self.active_field = field;
        }
    }

    // Department cascade

    pub fn begin_department_load(&mut self, ticket: LoadTicket) {
        self.department.begin_loading(ticket);
    }

    pub fn apply_departments(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Department>, ProviderError>,
    ) -> LoadApplied {
        match result {
            Ok(departments) => {
                if self.department.finish_loading(ticket, departments) {
                    LoadApplied::Applied
                } else {
                    LoadApplied::Stale
                }
            }
            Err(err) => {
                if self.department.fail_loading(ticket, err.to_string()) {
                    LoadApplied::Failed(err)
                } else {
                    LoadApplied::Stale
                }
            }
        }
    }

    /// Select the highlighted department.
    ///
    /// Returns the department whose issue types must now be loaded, or `None`
    /// when nothing changed. A change clears the issue type.
    pub fn select_department(&mut self) -> Option<Department> {
        let previous = self.department.selected().cloned();
        let chosen = self.department.select_highlighted()?.clone();
        if previous.as_ref() == Some(&chosen) {
            return None;
        }
        self.issue_type.reset();
        self.issue_types_for = None;
        Some(chosen)
    }

    pub fn begin_issue_type_load(&mut self, ticket: LoadTicket) {
        self.issue_type.begin_loading(ticket);
    }

    /// Apply issue types loaded for `department`; results for any department
    /// other than the selected one, or from a superseded request, are dropped.
    pub fn apply_issue_types(
        &mut self,
        ticket: LoadTicket,
        department: &Department,
        result: Result<Vec<IssueTypeOption>, ProviderError>,
    ) -> LoadApplied {
        if self.department.selected() != Some(department) {
            return LoadApplied::Stale;
        }
        match result {
            Ok(options) => {
                if self.issue_type.finish_loading(ticket, options) {
                    self.issue_types_for = Some(department.clone());
                    LoadApplied::Applied
                } else {
                    LoadApplied::Stale
                }
            }
            Err(err) => {
                if self.issue_type.fail_loading(ticket, err.to_string()) {
                    LoadApplied::Failed(err)
                } else {
                    LoadApplied::Stale
                }
            }
        }
    }

    pub fn is_issue_type_enabled(&self) -> bool {
        self.department.selected().is_some()
    }

    /// Select the highlighted issue type and overwrite the description with
    /// its template (or empty text when it has none).
    pub fn select_issue_type(&mut self) -> bool {
        if !self.is_issue_type_enabled() {
            return false;
        }
        let template = match self.issue_type.select_highlighted() {
            Some(option) => option.template().unwrap_or_default().to_string(),
            None => return false,
        };
        self.description.set_value(&template);
        true
    }

    /// Template of the selected issue type, if any
    pub fn active_template(&self) -> Option<&str> {
        self.issue_type.selected().and_then(IssueTypeOption::template)
    }

    // Validation

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.department.status() != FieldStatus::Set {
            errors.push(ValidationError::Required(FieldId::Department));
        }

        let issue_type_in_scope = self.issue_type.selected().is_some()
            && self.issue_types_for.is_some()
            && self.issue_types_for.as_ref() == self.department.selected();
        if !issue_type_in_scope {
            errors.push(ValidationError::Required(FieldId::IssueType));
        }

        // Length needs no check here, TextField never holds more than its limit
        if self.description.is_empty() {
            errors.push(ValidationError::Required(FieldId::Description));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Error to display for a field; only shown once the field was touched
    /// or a submit was attempted
    pub fn visible_error(&self, field: FieldId) -> Option<ValidationError> {
        if !self.submit_attempted && !self.touched.contains(&field) {
            return None;
        }
        self.validate().into_iter().find(|e| e.field() == field)
    }

    /// Validate and produce the report
    pub fn submit(&mut self) -> Result<SubmittedReport, Vec<ValidationError>> {
        self.submit_attempted = true;
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        match (self.department.selected(), self.issue_type.selected()) {
            (Some(department), Some(option)) => Ok(SubmittedReport {
                department: department.clone(),
                issue_type: option.issue_type.clone(),
                description: self.description.value().to_string(),
                cc: self.cc.values().to_vec(),
            }),
            _ => Err(vec![ValidationError::Required(FieldId::IssueType)]),
        }
    }

    // Text input routed by focus

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FieldId::Description => {
                self.description.push_char(c);
            }
            FieldId::Cc => self.cc.push_char(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FieldId::Description => self.description.pop_char(),
            FieldId::Cc => self.cc.backspace(),
            _ => {}
        }
    }
}
