//! Dashboard tab: the full record table with view/delete actions.
//!
//! This view formats preference badges and the detail body inline; it does
//! not go through the records view's presentation adapter.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use consentdeck_core::models::ConsentRecord;

use crate::app::{App, AppState, Tab};
use crate::controller::FetchState;
use crate::ui::presenter::DerivedTimestamps;
use crate::ui::styles;
use crate::utils::{
    format_instant, format_optional, format_timestamp, title_case_key, truncate, NOT_AVAILABLE,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_search_box(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.state == AppState::Searching && app.current_tab == Tab::Dashboard;
    let cursor = if focused { "▌" } else { "" };

    let content = Line::from(vec![
        Span::styled(
            format!("{}{}", app.dashboard.search_query, cursor),
            styles::search_style(),
        ),
    ]);

    let block = Block::default()
        .title(" Search by Consent ID ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Consent Records ({}) ", app.dashboard.records.len()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    match &app.dashboard.fetch {
        FetchState::Loading => {
            let line = Line::from(Span::styled("Loading...", styles::muted_style()));
            frame.render_widget(Paragraph::new(line).block(block), area);
            return;
        }
        FetchState::Error(message) => {
            let line = Line::from(Span::styled(
                format!("Error: {}", message),
                styles::error_style(),
            ));
            frame.render_widget(Paragraph::new(line).block(block), area);
            return;
        }
        FetchState::Idle | FetchState::Loaded => {}
    }

    if app.dashboard.records.is_empty() {
        let line = Line::from(Span::styled("No data available", styles::muted_style()));
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let header = Row::new([
        Cell::from("Consent ID"),
        Cell::from("IP Address"),
        Cell::from("ISP"),
        Cell::from("City"),
        Cell::from("Country"),
        Cell::from("Purpose"),
        Cell::from("Status"),
        Cell::from("Created At"),
        Cell::from("Deleted At"),
        Cell::from("Expires At"),
        Cell::from("Preferences"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .dashboard
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i == app.dashboard.selection {
                styles::selected_style()
            } else if record.is_deleted() {
                styles::warning_row_style()
            } else {
                styles::list_item_style()
            };
            record_row(record).style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // Consent ID
        Constraint::Fill(2), // IP Address
        Constraint::Fill(2), // ISP
        Constraint::Fill(1), // City
        Constraint::Fill(1), // Country
        Constraint::Fill(2), // Purpose
        Constraint::Fill(1), // Status
        Constraint::Fill(2), // Created At
        Constraint::Fill(2), // Deleted At
        Constraint::Fill(2), // Expires At
        Constraint::Fill(3), // Preferences
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.dashboard.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn record_row(record: &ConsentRecord) -> Row<'static> {
    let expires = record
        .expires_at()
        .map(format_instant)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Row::new(vec![
        Cell::from(truncate(&format_optional(Some(record.consent_id.as_str())), 24)),
        Cell::from(format_optional(record.ip_address.as_deref())),
        Cell::from(format_optional(record.isp.as_deref())),
        Cell::from(format_optional(record.city.as_deref())),
        Cell::from(format_optional(record.country.as_deref())),
        Cell::from(format_optional(record.purpose.as_deref())),
        Cell::from(format_optional(record.consent_status.as_deref())),
        Cell::from(format_timestamp(record.created_at())),
        Cell::from(format_timestamp(record.deleted_at())),
        Cell::from(expires),
        Cell::from(preferences_line(record)),
    ])
}

/// Badge line for a record's preferences: green = granted, red = denied,
/// keys spaced out of camelCase.
fn preferences_line(record: &ConsentRecord) -> Line<'static> {
    if record.preferences.is_empty() {
        return Line::from(Span::styled(NOT_AVAILABLE, styles::muted_style()));
    }

    let mut spans = Vec::with_capacity(record.preferences.len() * 2);
    for (i, (key, granted)) in record.preferences.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if *granted {
            styles::badge_granted_style()
        } else {
            styles::badge_denied_style()
        };
        spans.push(Span::styled(
            format!("{}: {}", title_case_key(key), if *granted { "Yes" } else { "No" }),
            style,
        ));
    }
    Line::from(spans)
}

/// Detail-modal body for the dashboard's view action.
pub fn detail_lines(record: &ConsentRecord, stamps: &DerivedTimestamps) -> Vec<Line<'static>> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<16}", label), styles::muted_style()),
            Span::raw(value),
        ])
    };

    let cookie = record.timestamps.cookie_preferences.as_ref();

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Details for {}", record.consent_id),
            styles::title_style(),
        )),
        Line::from(""),
        field("Consent ID:", format_optional(Some(record.consent_id.as_str()))),
        field("IP Address:", format_optional(record.ip_address.as_deref())),
        field("ISP:", format_optional(record.isp.as_deref())),
        field("City:", format_optional(record.city.as_deref())),
        field("Country:", format_optional(record.country.as_deref())),
        field("Purpose:", format_optional(record.purpose.as_deref())),
        field(
            "Consent Status:",
            format_optional(record.consent_status.as_deref()),
        ),
        Line::from(""),
        field(
            "Cookie Stamps:",
            format!(
                "Created: {}, Updated: {}",
                format_timestamp(cookie.and_then(|s| s.created_at.as_deref())),
                format_timestamp(cookie.and_then(|s| s.updated_at.as_deref())),
            ),
        ),
        field("Created At:", stamps.created_at.clone()),
        field("Deleted At:", stamps.deleted_at.clone()),
        field("Expires At:", stamps.expires_at.clone()),
        Line::from(""),
    ];

    let mut pref_line = vec![Span::styled(
        format!("{:<16}", "Preferences:"),
        styles::muted_style(),
    )];
    pref_line.extend(preferences_line(record).spans);
    lines.push(Line::from(pref_line));

    lines.push(field(
        "Username:",
        format_optional(record.username.as_deref()),
    ));
    lines
}
