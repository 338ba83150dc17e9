//! Field rendering utilities for forms

use crate::state::{FieldStatus, MultiValueField, SelectField, TextField, ValidationError};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CURSOR: &str = "▌";

fn border_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn field_block(label: &str, is_active: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style(is_active))
}

fn placeholder(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

/// Draw a single-choice selector.
///
/// When focused the options are laid out inline with the highlighted one
/// reversed; otherwise only the selection (or placeholder) is shown.
pub fn draw_select_field<T: Clone + PartialEq>(
    frame: &mut Frame,
    area: Rect,
    field: &SelectField<T>,
    label_of: impl Fn(&T) -> String,
    is_active: bool,
    is_enabled: bool,
) {
    let line = if !is_enabled {
        Line::from(placeholder(field.placeholder))
    } else if field.status() == FieldStatus::Pending {
        Line::from(Span::styled(
            "Loading…",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(reason) = field.load_error() {
        Line::from(Span::styled(
            format!("Failed to load: {reason}"),
            Style::default().fg(Color::Red),
        ))
    } else if is_active && !field.options().is_empty() {
        let mut spans = Vec::new();
        for (idx, option) in field.options().iter().enumerate() {
            let marker = if field.selected_index() == Some(idx) {
                "● "
            } else {
                "○ "
            };
            let style = if idx == field.highlighted() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!("{marker}{}", label_of(option)), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    } else {
        match field.selected() {
            Some(option) => Line::from(Span::styled(
                label_of(option),
                Style::default().fg(Color::White),
            )),
            None => Line::from(placeholder(field.placeholder)),
        }
    };

    frame.render_widget(
        Paragraph::new(line).block(field_block(field.label, is_active && is_enabled)),
        area,
    );
}

/// Draw a multiline text field with a cursor
pub fn draw_text_field(
    frame: &mut Frame,
    area: Rect,
    field: &TextField,
    is_active: bool,
    show_placeholder: bool,
) {
    let cursor_style = Style::default().fg(Color::Cyan);
    let mut lines: Vec<Line> = if field.is_empty() {
        if show_placeholder {
            vec![Line::from(placeholder(field.placeholder))]
        } else {
            vec![]
        }
    } else {
        // split('\n') keeps a trailing empty line so the cursor follows a newline
        field
            .value()
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect()
    };

    if is_active {
        let cursor = Span::styled(CURSOR, cursor_style);
        if field.is_empty() {
            match lines.first_mut() {
                Some(first) => first.spans.insert(0, cursor),
                None => lines.push(Line::from(cursor)),
            }
        } else if let Some(last) = lines.last_mut() {
            last.spans.push(cursor);
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(field_block(field.label, is_active)),
        area,
    );
}

/// Draw a multi-value entry: committed values as chips followed by the pending input
pub fn draw_multi_value_field(
    frame: &mut Frame,
    area: Rect,
    field: &MultiValueField,
    is_active: bool,
) {
    let mut spans = Vec::new();
    for value in field.values() {
        spans.push(Span::styled(
            format!("[{value}]"),
            Style::default().fg(Color::Blue),
        ));
        spans.push(Span::raw(" "));
    }

    if field.values().is_empty() && field.input().is_empty() && !is_active {
        spans.push(placeholder(field.placeholder));
    } else {
        spans.push(Span::raw(field.input().to_string()));
    }
    if is_active {
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(field_block(field.label, is_active)),
        area,
    );
}

/// Draw the inline alert line under a field
pub fn draw_alert(frame: &mut Frame, area: Rect, error: Option<ValidationError>) {
    if let Some(error) = error {
        let alert = Paragraph::new(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(alert, area);
    }
}
