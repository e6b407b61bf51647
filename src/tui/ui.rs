// ui rendering

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

use crate::core::text::{Tag, TaggedLine};
use crate::tui::app::{App, LogLevel, Screen};
use crate::tui::grid::{Grid, row_lines, text_width};
use crate::tui::viewport::visible_rows;

const TABLES_HELP: &str = "j/k move  Enter open  v view  i schema  s sql  q quit";
const ROWS_HELP: &str = "j/k move  e edit  d delete  r reload  w wrap  i schema  s sql  b back";
const SCHEMA_HELP: &str = "up/down PgUp/PgDn scroll  any other key returns";

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // clear with bg color
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(app.theme.base()), area);

    // grid on top, status line at the bottom
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    app.set_page_rows(visible_rows(area.height));

    match app.screen {
        Screen::Tables => render_tables(frame, app, main[0]),
        Screen::Rows => render_rows(frame, app, main[0]),
        Screen::Schema => render_schema(frame, app, main[0]),
    }

    render_status(frame, app, main[1]);
}

fn render_tables(frame: &mut Frame, app: &mut App, area: Rect) {
    let list = &app.tables;

    let mut header = vec![TaggedLine::new(
        Tag::Title,
        format!("Tables in {} ({})", app.database, list.summaries.len()),
    )];
    if let Some(columns) = list.header() {
        header.push(TaggedLine::new(Tag::Header, columns));
    }

    let selected = list.viewport.selected();
    let body: Vec<TaggedLine> = list
        .lines()
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let tag = if i == selected { Tag::Selected } else { Tag::Plain };
            TaggedLine::new(tag, text)
        })
        .collect();

    let footer = [TaggedLine::new(Tag::Muted, TABLES_HELP)];
    let grid = Grid::new(&body, &app.theme)
        .header(&header)
        .footer(&footer)
        .offset(list.viewport.offset());
    frame.render_widget(grid, area);
}

fn render_rows(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(view) = app.rows.as_ref() else {
        return;
    };

    let header = [
        TaggedLine::new(Tag::Title, view.title()),
        TaggedLine::new(Tag::Header, view.header()),
    ];

    let body = if view.texts.is_empty() {
        vec![TaggedLine::new(Tag::Muted, "(no rows)")]
    } else {
        row_lines(
            &view.texts,
            &view.viewport,
            text_width(area.width),
            app.page_rows,
        )
    };

    let footer = [TaggedLine::new(Tag::Muted, ROWS_HELP)];
    let grid = Grid::new(&body, &app.theme).header(&header).footer(&footer);
    frame.render_widget(grid, area);
}

fn render_schema(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(view) = app.schema.as_mut() else {
        return;
    };

    view.layout((area.width as usize).saturating_sub(2).max(1));

    let footer = [TaggedLine::new(Tag::Muted, SCHEMA_HELP)];
    let grid = Grid::new(&view.lines, &app.theme)
        .footer(&footer)
        .offset(view.scroll.pos());
    frame.render_widget(grid, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = if let Some(view) = app.rows.as_ref().filter(|v| v.confirm_delete) {
        let rowid = view.selected().map(|(rowid, _)| rowid).unwrap_or_default();
        Line::from(vec![
            Span::styled(format!("Delete row {rowid}? "), theme.warning()),
            Span::styled("(y/N)", theme.accent()),
        ])
    } else if let Some(entry) = app.status() {
        let style = match entry.level {
            LogLevel::Ok => theme.success(),
            LogLevel::Info => theme.base(),
            LogLevel::Warn => theme.warning(),
            LogLevel::Error => theme.error(),
        };
        Line::styled(entry.line(), style)
    } else {
        Line::styled(format!("litebrowse - {}", app.database), theme.muted())
    };

    frame.render_widget(Paragraph::new(line).style(theme.base()), area);
}
