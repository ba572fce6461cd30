// ============================================================================
// Data Ingestion pane
// ============================================================================
// Form with the seven OHLCV fields. The focused field shows a block cursor
// while edit mode is active; the submission status is rendered as a banner
// under the fields.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, FormStatus, INGEST_FIELDS};

/// Draws the OHLCV ingestion form.
pub fn render_ingest_pane(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INGEST_FIELDS.len() as u16 + 2), // fields + borders
            Constraint::Length(3),                              // status banner
            Constraint::Min(0),
        ])
        .split(area);

    render_fields(frame, app, chunks[0]);
    render_status(frame, &app.ingest_form.status, chunks[1]);
}

fn render_fields(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.ingest_form;

    let lines: Vec<Line> = INGEST_FIELDS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let focused = i == form.focus;

            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut spans = vec![
                Span::styled(format!(" {:<10} ", label), label_style),
                Span::styled(form.fields[i].as_str(), Style::default().fg(Color::White)),
            ];

            if focused && app.is_editing() {
                spans.push(Span::styled(
                    "█",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::SLOW_BLINK),
                ));
            }

            // Hint the expected format for the timestamp field
            if i == 1 && form.fields[i].is_empty() {
                spans.push(Span::styled(
                    "YYYY-MM-DDTHH:MM:SS",
                    Style::default().fg(Color::DarkGray),
                ));
            }

            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.is_editing() {
            Color::Green
        } else {
            Color::Cyan
        }))
        .title(" Ingest OHLCV Data ");

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, status: &FormStatus, area: Rect) {
    let line = match status {
        FormStatus::Idle => Line::from(Span::styled(
            "Fill all fields, then press [Enter] to submit",
            Style::default().fg(Color::Gray),
        )),
        FormStatus::Submitting => Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        )),
        FormStatus::Success => Line::from(Span::styled(
            "✓ Data inserted!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        FormStatus::Error(message) => Line::from(Span::styled(
            format!("✗ {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    };

    let paragraph = Paragraph::new(vec![line])
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
