// event handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::app::{App, LogLevel, Move, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// back to the table list, summaries re-read
    ShowTables,
    OpenTable(String),
    Reload,
    Schema(String),
    Sql,
    Edit,
    DeleteRow,
}

/// Blocks until the next terminal event.
pub fn read_event() -> std::io::Result<Event> {
    event::read()
}

pub fn handle_event(app: &mut App, event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        _ => Action::None,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    // global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.screen {
        Screen::Tables => handle_tables_key(app, key),
        Screen::Rows if app.confirming_delete() => handle_confirm_key(app, key),
        Screen::Rows => handle_rows_key(app, key),
        Screen::Schema => handle_schema_key(app, key),
    }
}

fn navigation(key: KeyEvent) -> Option<Move> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Move::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Move::Up),
        KeyCode::PageDown => Some(Move::PageDown),
        KeyCode::PageUp => Some(Move::PageUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Move::First),
        KeyCode::Char('G') | KeyCode::End => Some(Move::Last),
        _ => None,
    }
}

fn handle_tables_key(app: &mut App, key: KeyEvent) -> Action {
    if let Some(step) = navigation(key) {
        app.navigate(step);
        return Action::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Enter => match app.selected_table() {
            Some(name) => Action::OpenTable(name.to_string()),
            None => Action::None,
        },
        KeyCode::Char('v') => {
            app.toggle_table_view();
            Action::None
        }
        KeyCode::Char('i') => match app.selected_table() {
            Some(name) => Action::Schema(name.to_string()),
            None => Action::None,
        },
        KeyCode::Char('s') => Action::Sql,
        _ => Action::None,
    }
}

fn handle_rows_key(app: &mut App, key: KeyEvent) -> Action {
    if let Some(step) = navigation(key) {
        app.navigate(step);
        return Action::None;
    }

    match key.code {
        KeyCode::Char('b') | KeyCode::Char('q') | KeyCode::Esc => Action::ShowTables,
        KeyCode::Char('e') => Action::Edit,
        KeyCode::Char('d') => {
            if !app.request_delete() {
                app.log(LogLevel::Warn, "no row to delete".to_string());
            }
            Action::None
        }
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('w') => {
            app.toggle_wrap();
            Action::None
        }
        KeyCode::Char('i') => match app.current_table() {
            Some(name) => Action::Schema(name.to_string()),
            None => Action::None,
        },
        KeyCode::Char('s') => Action::Sql,
        _ => Action::None,
    }
}

// y/Y deletes, anything else declines
fn handle_confirm_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.clear_delete();
            Action::DeleteRow
        }
        _ => {
            app.cancel_delete();
            Action::None
        }
    }
}

fn handle_schema_key(app: &mut App, key: KeyEvent) -> Action {
    let step = match key.code {
        KeyCode::Down => Some(Move::Down),
        KeyCode::Up => Some(Move::Up),
        KeyCode::PageDown => Some(Move::PageDown),
        KeyCode::PageUp => Some(Move::PageUp),
        _ => None,
    };

    match step {
        Some(step) => {
            app.navigate(step);
            Action::None
        }
        // back in the row view the table is re-read; the table list keeps
        // the summaries it was entered with
        None => match app.close_schema() {
            Screen::Rows => Action::Reload,
            _ => Action::None,
        },
    }
}
