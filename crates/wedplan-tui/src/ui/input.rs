//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Confirm, Tab, PAGE_SCROLL_SIZE};
use crate::form::FormKind;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Every key can change what is on screen
    app.request_redraw();

    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::Confirming(_) => Ok(handle_confirm_input(app, key)),
        AppState::Editing => {
            handle_form_input(app, key);
            Ok(false)
        }
        AppState::Searching => {
            handle_search_input(app, key);
            Ok(false)
        }
        AppState::Quitting => Ok(true),
        AppState::Normal => Ok(handle_normal_input(app, key)),
    }
}

fn handle_confirm_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.decline();
            false
        }
        _ => false,
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_form();
        return;
    }
    if key.code == KeyCode::Enter {
        app.submit_form();
        return;
    }

    let Some(form) = app.form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    let on_choice = form.focused().is_some_and(|f| f.is_choice());

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left if on_choice => form.cycle_choice(false),
        KeyCode::Right | KeyCode::Char(' ') if on_choice => form.cycle_choice(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter | KeyCode::Down => app.finish_search(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> bool {
    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Confirming(Confirm::Quit);
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        KeyCode::Char('1') => app.select_tab(Tab::Dashboard),
        KeyCode::Char('2') => app.select_tab(Tab::Expenses),
        KeyCode::Char('3') => app.select_tab(Tab::Guests),
        KeyCode::Char('4') => app.select_tab(Tab::Tasks),
        KeyCode::Char('5') => app.select_tab(Tab::Settings),
        KeyCode::Left => app.select_tab(app.current_tab.prev()),
        KeyCode::Right => app.select_tab(app.current_tab.next()),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        _ => handle_tab_input(app, key),
    }
    false
}

/// Keys whose meaning depends on the current tab.
fn handle_tab_input(app: &mut App, key: KeyEvent) {
    match (app.current_tab, key.code) {
        (Tab::Expenses, KeyCode::Char('a')) => app.open_form(FormKind::Expense),
        (Tab::Guests, KeyCode::Char('a')) => app.open_form(FormKind::Guest),
        (Tab::Tasks, KeyCode::Char('a')) => app.open_form(FormKind::Task),
        (Tab::Expenses | Tab::Guests | Tab::Tasks, KeyCode::Char('d') | KeyCode::Delete) => {
            app.request_delete()
        }
        (Tab::Expenses | Tab::Guests | Tab::Tasks, KeyCode::Char('f')) => app.cycle_filter(),
        (Tab::Guests, KeyCode::Char('/')) => app.start_search(),
        (Tab::Guests, KeyCode::Char('s')) => app.cycle_selected_guest_status(),
        (Tab::Guests, KeyCode::Esc) => app.clear_search(),
        (Tab::Tasks, KeyCode::Char(' ') | KeyCode::Enter) => app.toggle_selected_task(),
        (Tab::Settings | Tab::Dashboard, KeyCode::Char('e') | KeyCode::Enter) => {
            app.open_form(FormKind::Settings)
        }
        (Tab::Settings, KeyCode::Char('R')) => {
            app.state = AppState::Confirming(Confirm::ResetAll);
        }
        _ => {}
    }
}
