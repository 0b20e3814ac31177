//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes. Search keystrokes
//! restart the debounce timer; the request itself fires from the event-loop
//! tick once the quiet period elapses.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle soft-delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_soft_delete();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_soft_delete();
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle detail modal - any dismissal removes it
    if matches!(app.state, AppState::ShowingDetail) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.close_detail();
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => {
            app.current_tab = Tab::Dashboard;
        }
        KeyCode::Char('2') => {
            app.current_tab = Tab::Records;
        }
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            app.current_tab = app.current_tab.next();
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Char('r') => {
            app.refresh_current();
        }
        KeyCode::Up | KeyCode::Char('k') => select_prev(app, 1),
        KeyCode::Down | KeyCode::Char('j') => select_next(app, 1),
        KeyCode::PageUp => select_prev(app, PAGE_SCROLL_SIZE),
        KeyCode::PageDown => select_next(app, PAGE_SCROLL_SIZE),
        KeyCode::Enter | KeyCode::Char('v') => {
            app.view_selected();
        }
        // Dashboard-only actions
        KeyCode::Char('d') if app.current_tab == Tab::Dashboard => {
            app.request_soft_delete();
        }
        KeyCode::Char('l') if app.current_tab == Tab::Dashboard => {
            app.logout();
        }
        // Records-only toggles
        KeyCode::Char('f') if app.current_tab == Tab::Records => {
            app.table.cycle_status_filter();
        }
        KeyCode::Char('t') if app.current_tab == Tab::Records => {
            app.table.toggle_show_deleted();
        }
        _ => {}
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.active_search_query_mut().pop();
            app.bump_search_debounce();
        }
        KeyCode::Char(c) => {
            app.active_search_query_mut().push(c);
            app.bump_search_debounce();
        }
        _ => {}
    }
    Ok(false)
}

fn select_next(app: &mut App, step: usize) {
    match app.current_tab {
        Tab::Dashboard => app.dashboard.select_next(step),
        Tab::Records => app.table.select_next(step),
    }
}

fn select_prev(app: &mut App, step: usize) {
    match app.current_tab {
        Tab::Dashboard => app.dashboard.select_prev(step),
        Tab::Records => app.table.select_prev(step),
    }
}
