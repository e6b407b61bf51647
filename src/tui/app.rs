// app state for the tui

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::core::text::{TaggedLine, display_width, human_size, pad_left, pad_right};
use crate::core::{RowSet, SchemaReport, TableSummary};
use crate::tui::grid::row_text;
use crate::tui::theme::{Theme, ThemeKind};
use crate::tui::viewport::{PadScroll, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Tables,
    Rows,
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

impl LogEntry {
    pub fn line(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Down,
    Up,
    PageDown,
    PageUp,
    First,
    Last,
}

pub struct TableList {
    pub summaries: Vec<TableSummary>,
    pub column_view: bool,
    pub viewport: Viewport,
}

impl TableList {
    pub fn selected(&self) -> Option<&TableSummary> {
        self.summaries.get(self.viewport.selected())
    }

    /// Column header for the aligned view, `None` in inline view.
    pub fn header(&self) -> Option<String> {
        if !self.column_view {
            return None;
        }
        let (name_w, rows_w, size_w) = self.widths();
        Some(
            format!(
                "{}  {}  {}",
                pad_right("Name", name_w),
                pad_left("Rows", rows_w),
                pad_left("Size", size_w)
            )
            .trim_end()
            .to_string(),
        )
    }

    /// One display line per table.
    pub fn lines(&self) -> Vec<String> {
        if self.column_view {
            let (name_w, rows_w, size_w) = self.widths();
            self.summaries
                .iter()
                .map(|t| {
                    let rows = t.rows.unwrap_or(0).to_string();
                    let size = t.size.map(human_size).unwrap_or_default();
                    format!(
                        "{}  {}  {}",
                        pad_right(&t.name, name_w),
                        pad_left(&rows, rows_w),
                        pad_left(&size, size_w)
                    )
                    .trim_end()
                    .to_string()
                })
                .collect()
        } else {
            self.summaries.iter().map(inline_summary).collect()
        }
    }

    fn widths(&self) -> (usize, usize, usize) {
        let mut name_w = display_width("Name");
        let mut rows_w = display_width("Rows");
        let mut size_w = display_width("Size");
        for t in &self.summaries {
            name_w = name_w.max(display_width(&t.name));
            rows_w = rows_w.max(t.rows.unwrap_or(0).to_string().len());
            size_w = size_w.max(t.size.map(human_size).unwrap_or_default().len());
        }
        (name_w, rows_w, size_w)
    }
}

fn inline_summary(t: &TableSummary) -> String {
    match (t.rows, t.size) {
        (Some(rows), Some(size)) => format!("{} ({rows} rows, {})", t.name, human_size(size)),
        (Some(rows), None) => format!("{} ({rows} rows)", t.name),
        (None, _) => t.name.clone(),
    }
}

pub struct RowView {
    pub table: String,
    pub rows: RowSet,
    /// display line per record, built once per load
    pub texts: Vec<String>,
    pub viewport: Viewport,
    pub confirm_delete: bool,
}

impl RowView {
    fn new(table: String, rows: RowSet, viewport: Viewport) -> Self {
        let texts = rows.records.iter().map(|r| row_text(r)).collect();
        Self {
            table,
            rows,
            texts,
            viewport,
            confirm_delete: false,
        }
    }

    pub fn title(&self) -> String {
        format!("Table: {} ({} rows)", self.table, self.rows.len())
    }

    pub fn header(&self) -> String {
        self.rows.columns.join(" | ")
    }

    pub fn selected(&self) -> Option<(i64, &[Value])> {
        let i = self.viewport.selected();
        let rowid = *self.rows.rowids.get(i)?;
        let record = self.rows.records.get(i)?;
        Some((rowid, record.as_slice()))
    }
}

pub struct SchemaView {
    pub report: SchemaReport,
    pub scroll: PadScroll,
    /// composed lines and the width they were composed for
    pub lines: Vec<TaggedLine>,
    pub width: usize,
    pub return_to: Screen,
}

impl SchemaView {
    /// Recomposes the report when the width changed since the last draw.
    pub fn layout(&mut self, width: usize) {
        if self.width != width || self.lines.is_empty() {
            self.lines = self.report.lines(width);
            self.width = width;
            self.scroll.scroll(0, self.lines.len());
        }
    }
}

pub struct App {
    pub running: bool,
    pub screen: Screen,
    pub theme: Theme,

    // database label for the table list title
    pub database: String,

    pub tables: TableList,
    pub rows: Option<RowView>,
    pub schema: Option<SchemaView>,

    // latest status message
    pub last_log: Option<LogEntry>,

    // data rows on screen, refreshed on every draw
    pub page_rows: usize,
}

impl App {
    pub fn new(database: String, summaries: Vec<TableSummary>, theme_kind: ThemeKind) -> Self {
        Self {
            running: true,
            screen: Screen::Tables,
            theme: Theme::from_kind(theme_kind),
            database,
            tables: TableList {
                summaries,
                column_view: true,
                viewport: Viewport::default(),
            },
            rows: None,
            schema: None,
            last_log: None,
            page_rows: 1,
        }
    }

    pub fn log(&mut self, level: LogLevel, message: String) {
        match level {
            LogLevel::Error => tracing::warn!("{message}"),
            _ => tracing::info!("{message}"),
        }
        self.last_log = Some(LogEntry {
            level,
            message,
            at: Local::now(),
        });
    }

    pub fn status(&self) -> Option<&LogEntry> {
        self.last_log.as_ref()
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.tables.selected().map(|t| t.name.as_str())
    }

    /// Table being looked at: the open one in the row view, the highlighted
    /// one in the table list.
    pub fn current_table(&self) -> Option<&str> {
        match (self.screen, &self.rows) {
            (Screen::Rows, Some(view)) => Some(view.table.as_str()),
            _ => self.selected_table(),
        }
    }

    // table list

    pub fn show_tables(&mut self, summaries: Vec<TableSummary>) {
        self.tables.summaries = summaries;
        let len = self.tables.summaries.len();
        self.tables.viewport.follow(len, self.page_rows);
        self.rows = None;
        self.screen = Screen::Tables;
    }

    pub fn toggle_table_view(&mut self) {
        self.tables.column_view = !self.tables.column_view;
    }

    // row view

    /// Enters a table with a fresh viewport.
    pub fn open_rows(&mut self, table: String, rows: RowSet) {
        self.rows = Some(RowView::new(table, rows, Viewport::default()));
        self.screen = Screen::Rows;
    }

    /// Replaces the loaded rows of the open table. Selection goes back to the
    /// top; wrap mode is kept.
    pub fn reload_rows(&mut self, rows: RowSet) {
        let Some(view) = self.rows.take() else {
            return;
        };
        let mut viewport = view.viewport;
        viewport.reset();
        self.rows = Some(RowView::new(view.table, rows, viewport));
    }

    pub fn toggle_wrap(&mut self) {
        let page = self.page_rows;
        if let Some(view) = self.rows.as_mut() {
            view.viewport.toggle_wrap(view.rows.len(), page);
        }
    }

    /// Arms the delete confirmation. Returns false when there is nothing to
    /// delete.
    pub fn request_delete(&mut self) -> bool {
        match self.rows.as_mut() {
            Some(view) if !view.rows.is_empty() => {
                view.confirm_delete = true;
                true
            }
            _ => false,
        }
    }

    pub fn clear_delete(&mut self) {
        if let Some(view) = self.rows.as_mut() {
            view.confirm_delete = false;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.clear_delete();
        self.log(LogLevel::Info, "delete cancelled".to_string());
    }

    pub fn confirming_delete(&self) -> bool {
        self.rows.as_ref().is_some_and(|v| v.confirm_delete)
    }

    // schema view

    pub fn open_schema(&mut self, report: SchemaReport) {
        let return_to = match self.screen {
            Screen::Schema => self
                .schema
                .as_ref()
                .map_or(Screen::Tables, |s| s.return_to),
            screen => screen,
        };
        self.schema = Some(SchemaView {
            report,
            scroll: PadScroll::default(),
            lines: Vec::new(),
            width: 0,
            return_to,
        });
        self.screen = Screen::Schema;
    }

    /// Leaves the schema view; returns the screen that is now showing.
    pub fn close_schema(&mut self) -> Screen {
        let back = self.schema.take().map_or(Screen::Tables, |s| s.return_to);
        self.screen = match back {
            Screen::Rows if self.rows.is_some() => Screen::Rows,
            _ => Screen::Tables,
        };
        self.screen
    }

    // navigation

    pub fn navigate(&mut self, step: Move) {
        let page = self.page_rows;
        match self.screen {
            Screen::Tables => {
                let len = self.tables.summaries.len();
                apply(&mut self.tables.viewport, step, len, page);
            }
            Screen::Rows => {
                if let Some(view) = self.rows.as_mut() {
                    apply(&mut view.viewport, step, view.rows.len(), page);
                }
            }
            Screen::Schema => {
                if let Some(view) = self.schema.as_mut() {
                    let len = view.lines.len();
                    let page = page as isize;
                    let delta = match step {
                        Move::Down => 1,
                        Move::Up => -1,
                        Move::PageDown => page,
                        Move::PageUp => -page,
                        Move::First => isize::MIN,
                        Move::Last => isize::MAX,
                    };
                    view.scroll.scroll(delta, len);
                }
            }
        }
    }

    /// Keeps the active selection on screen after the page size changed.
    pub fn set_page_rows(&mut self, page: usize) {
        self.page_rows = page.max(1);
        let len = self.tables.summaries.len();
        self.tables.viewport.follow(len, self.page_rows);
        if let Some(view) = self.rows.as_mut() {
            view.viewport.follow(view.rows.len(), self.page_rows);
        }
    }
}

fn apply(viewport: &mut Viewport, step: Move, len: usize, page: usize) {
    match step {
        Move::Down => viewport.down(len, page),
        Move::Up => viewport.up(len, page),
        Move::PageDown => viewport.page_down(len, page),
        Move::PageUp => viewport.page_up(len, page),
        Move::First => viewport.first(len, page),
        Move::Last => viewport.last(len, page),
    }
}
