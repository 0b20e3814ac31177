//! Records tab: builds its own screen chrome (title, search, status filter,
//! toggle-deleted control) and filters the cached list client-side. Badge
//! formatting goes through the injected presenter; rows are view-only.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use consentdeck_core::models::ConsentRecord;

use crate::app::{App, AppState, Tab};
use crate::controller::FetchState;
use crate::ui::presenter::RecordPresenter;
use crate::ui::styles;
use crate::utils::{format_instant, format_optional, format_timestamp, truncate, NOT_AVAILABLE};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Controls
            Constraint::Min(5),    // Table
        ])
        .split(area);

    render_title(frame, chunks[0]);
    render_controls(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        " Cookie Tracking Information",
        styles::title_style(),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let searching = app.state == AppState::Searching && app.current_tab == Tab::Records;
    let cursor = if searching { "▌" } else { "" };
    let search = Paragraph::new(Line::from(Span::styled(
        format!("{}{}", app.table.search_query, cursor),
        styles::search_style(),
    )))
    .block(
        Block::default()
            .title(" Search by Consent ID or IP ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(searching)),
    );
    frame.render_widget(search, chunks[0]);

    let filter = Paragraph::new(Line::from(Span::styled(
        app.table.status_filter.label(),
        styles::highlight_style(),
    )))
    .block(
        Block::default()
            .title(" Filter [f] ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(filter, chunks[1]);

    // The toggle-deleted button; its label follows the current state.
    let (toggle_label, toggle_style) = if app.table.show_deleted {
        ("Deleted: shown", styles::highlight_style())
    } else {
        ("Deleted: hidden", styles::muted_style())
    };
    let toggle = Paragraph::new(Line::from(Span::styled(toggle_label, toggle_style))).block(
        Block::default()
            .title(" Toggle Deleted [t] ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(toggle, chunks[2]);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.table.visible_records();

    let block = Block::default()
        .title(format!(
            " Records ({} of {}) ",
            visible.len(),
            app.table.records().len()
        ))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    match &app.table.fetch {
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

    if app.table.records().is_empty() {
        let line = Line::from(Span::styled("No data available", styles::muted_style()));
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    if visible.is_empty() {
        let line = Line::from(Span::styled(
            "No matching records found",
            styles::muted_style(),
        ));
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

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i == app.table.selection {
                styles::selected_style()
            } else if record.is_deleted() {
                styles::warning_row_style()
            } else {
                styles::list_item_style()
            };
            record_row(app, record).style(style)
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
    state.select(Some(app.table.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn record_row(app: &App, record: &ConsentRecord) -> Row<'static> {
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
        // Badge formatting is delegated to the injected presenter.
        Cell::from(app.table.presenter().format_preferences(&record.preferences)),
    ])
}
