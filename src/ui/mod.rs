//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod submitted;

use crate::app::App;
use crate::state::Phase;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let main_area = layout::create_layout(area);

    match &app.state.phase {
        Phase::Editing => forms::draw_report_form(frame, main_area, app),
        Phase::Submitted(report) => submitted::draw(frame, main_area, report),
    }

    layout::draw_status_bar(frame, app);

    // Modal error dialog on top of everything
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.error_count());
    }
}
