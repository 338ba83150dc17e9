//! Reusable UI components

mod button;
mod error_dialog;

pub use button::{render_action_button, BUTTON_HEIGHT};
pub use error_dialog::render_error_dialog;
