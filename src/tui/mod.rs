// terminal ui

mod app;
pub mod editor;
mod event;
pub mod grid;
pub mod session;
mod theme;
mod ui;
pub mod viewport;

pub use app::{App, LogLevel, Screen};
pub use theme::{ThemeKind, detect_theme};

use crate::Error;
use crate::core::{Db, EditOutcome, TableSummary, record, schema};
use crate::output::Output;
use event::{Action, handle_event, read_event};
use session::UiSession;

pub struct UiOptions {
    /// shown in the table list title
    pub database: String,
    pub editor: String,
    pub theme: ThemeKind,
}

pub async fn run(db: &Db, summaries: Vec<TableSummary>, options: UiOptions) -> Result<(), Error> {
    tracing::info!(theme = options.theme.name(), editor = %options.editor, "starting ui");
    let mut session = UiSession::start()?;
    let mut app = App::new(options.database, summaries, options.theme);
    app.set_page_rows(viewport::visible_rows(session.size()?.height));

    run_app(&mut session, &mut app, db, &options.editor).await
}

async fn run_app(
    session: &mut UiSession,
    app: &mut App,
    db: &Db,
    editor: &str,
) -> Result<(), Error> {
    while app.running {
        session.draw(|frame| ui::render(frame, app))?;

        let event = read_event().map_err(|e| Error::Terminal(e.to_string()))?;
        match handle_event(app, event) {
            Action::None => {}
            Action::Quit => app.running = false,
            Action::ShowTables => show_tables(app, db).await,
            Action::OpenTable(table) => match db.load_rows(&table).await {
                Ok(rows) => app.open_rows(table, rows),
                Err(e) => app.log(LogLevel::Error, format!("cannot read {table}: {e}")),
            },
            Action::Reload => reload(app, db).await,
            Action::Schema(table) => {
                let report = schema::inspect(db, &table).await;
                app.open_schema(report);
            }
            Action::Sql => {
                sql_prompt(session, app, db).await?;
                reload(app, db).await;
            }
            Action::Edit => {
                if let Err(e) = edit_selected(session, app, db, editor).await {
                    app.log(LogLevel::Error, format!("edit failed: {e}"));
                }
                reload(app, db).await;
            }
            Action::DeleteRow => {
                delete_selected(app, db).await;
                reload(app, db).await;
            }
        }
    }

    Ok(())
}

async fn show_tables(app: &mut App, db: &Db) {
    match db.table_summaries().await {
        Ok(summaries) => app.show_tables(summaries),
        Err(e) => {
            app.log(LogLevel::Error, format!("cannot list tables: {e}"));
            let summaries = std::mem::take(&mut app.tables.summaries);
            app.show_tables(summaries);
        }
    }
}

/// Re-reads whatever the current screen shows.
async fn reload(app: &mut App, db: &Db) {
    match app.screen {
        Screen::Rows => {
            let Some(table) = app.rows.as_ref().map(|v| v.table.clone()) else {
                return;
            };
            match db.load_rows(&table).await {
                Ok(rows) => app.reload_rows(rows),
                Err(e) => app.log(LogLevel::Error, format!("cannot read {table}: {e}")),
            }
        }
        Screen::Tables => show_tables(app, db).await,
        Screen::Schema => {}
    }
}

/// Reads one statement on the plain console, runs it and waits for Enter.
async fn sql_prompt(session: &mut UiSession, app: &mut App, db: &Db) -> Result<(), Error> {
    let mut console = session.suspend()?;

    let Some(line) = console.prompt("SQL> ")? else {
        return console.resume();
    };

    let sql = line.trim();
    if sql.is_empty() {
        println!("No SQL entered.");
    } else {
        tracing::info!(sql, "running statement");
        let result = db.execute(sql).await;
        Output::print(&result);
        let level = if result.is_ok() {
            LogLevel::Ok
        } else {
            LogLevel::Error
        };
        app.log(level, Output::summary(&result));
    }

    console.prompt("Press Enter to continue...")?;
    console.resume()
}

async fn edit_selected(
    session: &mut UiSession,
    app: &mut App,
    db: &Db,
    command: &str,
) -> Result<(), Error> {
    let target = app.rows.as_ref().and_then(|view| {
        let (rowid, record) = view.selected()?;
        Some((
            view.table.clone(),
            view.rows.columns.clone(),
            rowid,
            record.to_vec(),
        ))
    });
    let Some((table, columns, rowid, record)) = target else {
        app.log(LogLevel::Warn, "no row to edit".to_string());
        return Ok(());
    };

    let document = record::to_document(&columns, &record)?;
    let edited = editor::open_in_editor(session, command, &document).await?;

    match record::apply_edit(db, &table, &columns, &record, rowid, &edited).await? {
        EditOutcome::Saved { changed: 0 } => {
            app.log(LogLevel::Info, format!("row {rowid} unchanged"));
        }
        EditOutcome::Saved { changed } => {
            app.log(LogLevel::Ok, format!("row {rowid} updated ({changed} column(s))"));
        }
        EditOutcome::Discarded => {
            app.log(
                LogLevel::Info,
                "edit discarded: document is not a json object".to_string(),
            );
        }
    }
    Ok(())
}

async fn delete_selected(app: &mut App, db: &Db) {
    let Some((table, rowid)) = app
        .rows
        .as_ref()
        .and_then(|v| v.selected().map(|(rowid, _)| (v.table.clone(), rowid)))
    else {
        return;
    };

    match db.delete_row(&table, rowid).await {
        Ok(_) => app.log(LogLevel::Ok, format!("row {rowid} deleted")),
        Err(e) => app.log(LogLevel::Error, format!("delete failed: {e}")),
    }
}
