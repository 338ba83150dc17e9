//! Modal error dialog

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

const MAX_WIDTH: u16 = 60;
/// Borders plus one column of padding on each side
const CHROME: u16 = 4;

/// Render the oldest queued error centered over the screen.
///
/// `pending` is the number of queued errors; the title shows the queue
/// position once more than one is waiting.
pub fn render_error_dialog(frame: &mut Frame, message: &str, pending: usize) {
    let screen = frame.area();
    let title = if pending > 1 {
        format!(" Error (1 of {pending}) ")
    } else {
        " Error ".to_string()
    };

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = Line::from(vec![
        Span::styled("Enter", key_style),
        Span::raw("/"),
        Span::styled("Esc", key_style),
        Span::raw(" to dismiss, then "),
        Span::styled(crate::platform::RETRY_SHORTCUT, key_style),
        Span::raw(" to retry"),
    ]);

    let text_width = MAX_WIDTH.min(screen.width).saturating_sub(CHROME).max(1);
    let body = wrap_words(message, usize::from(text_width));

    let widest = body
        .iter()
        .map(|l| l.chars().count())
        .chain([title.chars().count(), hint.width()])
        .max()
        .unwrap_or(0);
    let width = (widest as u16).saturating_add(CHROME).min(screen.width);
    // body + blank + hint + borders
    let height = body.len() as u16 + 4;

    let mut lines: Vec<Line> = body.into_iter().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(hint);

    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .padding(Padding::horizontal(1));

    let area = centered(screen, width, height);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Greedy word wrap; a word longer than `width` gets a line of its own
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let line_len = line.chars().count();
            if line_len > 0 && line_len + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
