// ============================================================================
// Dashboard - Root rendering
// ============================================================================
// Draws the whole interface: the tab bar, exactly one pane body selected by
// the active tab, and the footer with shortcuts and status banners.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, FormStatus, Tab};
use crate::ui::{gauge, ingest};

/// Draws the complete interface.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_tab_bar(frame, app, chunks[0]);

    // Exactly one pane body, routed by the active tab
    match app.active_tab {
        Tab::Overview => render_overview(frame, app, chunks[1]),
        Tab::Ingestion => ingest::render_ingest_pane(frame, app, chunks[1]),
        Tab::Predictions => render_predictions(frame, app, chunks[1]),
        Tab::Analytics => render_placeholder(
            frame,
            " Analytics ",
            "Analytics, charts and model performance metrics will appear here.",
            chunks[1],
        ),
        Tab::Settings => render_placeholder(
            frame,
            " Settings ",
            "Preferences, API keys and other settings will appear here.",
            chunks[1],
        ),
    }

    render_footer(frame, app, chunks[2]);
}

/// Main layout: tab bar, content, footer.
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Pane content
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Tab bar
// ============================================================================

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {}:{} ", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Crypto Investment Analysis ")
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(app.active_tab.index())
        .divider("|");

    frame.render_widget(tabs, area);
}

// ============================================================================
// Overview pane : ticker lookup + analysis results
// ============================================================================

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Ticker input
            Constraint::Length(3), // Risk gauge
            Constraint::Min(0),    // Predictions dump
        ])
        .split(area);

    render_ticker_input(frame, app, chunks[0]);

    if let Some(snapshot) = &app.last_prediction {
        gauge::render_risk_gauge(frame, &snapshot.result, chunks[1]);
        render_predictions_dump(frame, app, chunks[2]);
    } else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Press [i], type a crypto ticker and hit [Enter] to analyze it.",
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Analysis Results "))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[1].union(chunks[2]));
    }
}

fn render_ticker_input(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.ticker_form;

    let mut spans = vec![
        Span::styled(
            "Ticker: ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(form.input.as_str(), Style::default().fg(Color::White)),
    ];

    if app.is_editing() {
        spans.push(Span::styled(
            "█",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    } else if form.input.is_empty() {
        spans.push(Span::styled(
            "Enter crypto ticker",
            Style::default().fg(Color::DarkGray),
        ));
    }

    // Lookup failures show up here instead of silently keeping the old panel
    match &form.status {
        FormStatus::Error(message) => {
            spans.push(Span::styled(
                format!("   ✗ {}", message),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        FormStatus::Submitting => {
            spans.push(Span::styled(
                "   Analyzing...",
                Style::default().fg(Color::Yellow),
            ));
        }
        _ => {}
    }

    let border_color = if app.is_editing() { Color::Green } else { Color::Cyan };
    let paragraph = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    frame.render_widget(paragraph, area);
}

/// Raw dump of the predictions blob, shown verbatim.
fn render_predictions_dump(frame: &mut Frame, app: &App, area: Rect) {
    let body = app
        .last_prediction
        .as_ref()
        .map(|snapshot| pretty_predictions(&snapshot.result.predictions))
        .unwrap_or_default();

    let lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Detailed Predictions "),
    );

    frame.render_widget(paragraph, area);
}

/// Pretty-prints the predictions JSON without altering its content.
fn pretty_predictions(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ============================================================================
// Model Predictions pane
// ============================================================================

fn render_predictions(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Model Predictions ");

    let Some(snapshot) = &app.last_prediction else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No predictions yet. Run an analysis from the Overview tab.",
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", snapshot.ticker),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                gauge::gauge_label(snapshot.result.score, &snapshot.result.risk),
                Style::default().fg(gauge::risk_color(snapshot.result.risk_level())),
            ),
            Span::styled(
                format!(
                    "   as of {}",
                    snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];

    for raw in pretty_predictions(&snapshot.result.predictions).lines() {
        lines.push(Line::from(format!(" {}", raw)));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Static panes
// ============================================================================

fn render_placeholder(frame: &mut Frame, title: &str, text: &str, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title.to_string()),
    )
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_editing() {
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Submit  "),
            Span::styled("[↑↓/Tab]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Field  "),
            Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Done"),
        ])
    } else {
        let mut spans = vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[←→/1-5]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Tabs  "),
        ];
        if matches!(app.active_tab, Tab::Overview | Tab::Ingestion) {
            spans.push(Span::styled(
                "[i]",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" Edit  "));
        }
        if app.is_loading {
            spans.push(Span::styled(
                app.loading_message.clone().unwrap_or_else(|| "Loading...".to_string()),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
