//! Form rendering module
//!
//! - `field_renderer`: select, text and multi-value field widgets
//! - `report_form`: the issue report form with its action panel

mod field_renderer;
mod report_form;

pub use report_form::draw_report_form;
