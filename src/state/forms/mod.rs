//! Form domain layer
//!
//! Field value objects plus the report form that ties them together.

mod field;
mod form_state;

pub use field::{FieldStatus, MultiValueField, SelectField, TextField};
pub use form_state::{FieldId, LoadApplied, ReportForm, SubmittedReport, ValidationError};
