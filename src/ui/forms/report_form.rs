//! Issue report form rendering

use super::field_renderer::{
    draw_alert, draw_multi_value_field, draw_select_field, draw_text_field,
};
use crate::app::App;
use crate::catalog::{Department, IssueTypeOption};
use crate::state::FieldId;
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TEMPLATE_HINT: &str = "Please provide as many details as per provided template.";

/// Draw the report form with the action sidebar
pub fn draw_report_form(frame: &mut Frame, area: Rect, app: &App) {
    // Split into form (left) and action panel (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(24), // Action panel
        ])
        .split(area);

    draw_fields(frame, main_chunks[0], app);
    draw_action_panel(frame, main_chunks[1], app);
}

fn draw_fields(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let active = form.active_field;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Department
            Constraint::Length(1), // Department alert
            Constraint::Length(3), // Issue type
            Constraint::Length(1), // Issue type alert
            Constraint::Min(7),    // Description
            Constraint::Length(1), // Character count
            Constraint::Length(1), // Template hint / alert
            Constraint::Length(3), // CC
            Constraint::Length(1), // CC note
        ])
        .margin(1)
        .split(area);

    let form_focused = active != FieldId::Submit;
    let border_color = if form_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(" Report an Issue ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    frame.render_widget(block, area);

    draw_select_field(
        frame,
        chunks[0],
        &form.department,
        Department::label,
        active == FieldId::Department,
        true,
    );
    draw_alert(frame, chunks[1], form.visible_error(FieldId::Department));

    draw_select_field(
        frame,
        chunks[2],
        &form.issue_type,
        IssueTypeOption::label,
        active == FieldId::IssueType,
        form.is_issue_type_enabled(),
    );
    draw_alert(frame, chunks[3], form.visible_error(FieldId::IssueType));

    let template = form.active_template();
    draw_text_field(
        frame,
        chunks[4],
        &form.description,
        active == FieldId::Description,
        template.is_none(),
    );

    let count = Paragraph::new(format!(
        "{} / {} ",
        form.description.char_count(),
        form.description.max_chars()
    ))
    .alignment(Alignment::Right)
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(count, chunks[5]);

    // The required alert takes precedence over the template hint
    match form.visible_error(FieldId::Description) {
        Some(error) => draw_alert(frame, chunks[6], Some(error)),
        None if template.is_some() => {
            let hint = Paragraph::new(Span::styled(
                format!(" {TEMPLATE_HINT}"),
                Style::default().fg(Color::Yellow),
            ));
            frame.render_widget(hint, chunks[6]);
        }
        None => {}
    }

    draw_multi_value_field(frame, chunks[7], &form.cc, active == FieldId::Cc);
    let note = Paragraph::new(Line::from(Span::styled(
        " Optional. Addresses are not validated.",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(note, chunks[8]);
}

fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let is_focused = form.active_field == FieldId::Submit;
    let is_enabled = form.is_valid();

    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Min(0),                // Shortcut help
        ])
        .split(inner_area);

    render_action_button(
        frame,
        chunks[0],
        "Submit",
        is_focused,
        is_enabled,
        Some(Color::Green),
    );

    let help = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                crate::platform::SUBMIT_SHORTCUT,
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(": submit"),
        ]),
        Line::from(vec![
            Span::styled(
                crate::platform::RETRY_SHORTCUT,
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(": retry load"),
        ]),
    ])
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[1]);
}
