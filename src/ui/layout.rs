//! Layout components (content area, status bar)

use crate::app::App;
use crate::state::FieldId;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split off the bottom line for the status bar, returning the content area
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Loading indicator
    let form = &app.state.form;
    let loading = form.department.is_loading() || form.issue_type.is_loading();
    let indicator = if loading {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    };
    spans.push(indicator);

    let hints = get_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let quit_hint = " ^Q:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the focused field
fn get_hints(app: &App) -> String {
    if app.state.has_errors() {
        return "Enter/Esc:dismiss".to_string();
    }
    if app.state.is_submitted() {
        return "Enter/n:new report".to_string();
    }

    let submit = crate::platform::SUBMIT_SHORTCUT;
    match app.state.form.active_field {
        FieldId::Department | FieldId::IssueType => {
            format!("Tab:next  j/k:choose  Enter:select  {submit}:submit")
        }
        FieldId::Description => format!("Tab:next  Enter:newline  {submit}:submit"),
        FieldId::Cc => format!("Tab:next  Enter:add  Bksp:remove  Del:clear  {submit}:submit"),
        FieldId::Submit => "Tab:next  Enter:submit".to_string(),
    }
}
