//! Confirmation shown after a report is submitted

use crate::state::SubmittedReport;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, report: &SubmittedReport) {
    let label_style = Style::default().fg(Color::Cyan);
    let cc = if report.cc.is_empty() {
        "(none)".to_string()
    } else {
        report.cc.join(", ")
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Report submitted",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Department: ", label_style),
            Span::raw(report.department.label()),
        ]),
        Line::from(vec![
            Span::styled("Issue type: ", label_style),
            Span::raw(report.issue_type.label()),
        ]),
        Line::from(vec![Span::styled("CC: ", label_style), Span::raw(cc)]),
        Line::from(""),
        Line::from(Span::styled("Description:", label_style)),
    ];
    lines.extend(report.description.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to start a new report",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Issue Report ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}
