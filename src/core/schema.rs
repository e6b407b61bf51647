// schema inspector - gathers table metadata and lays it out as lines
// every section degrades on its own; a failing pragma never hides the rest

use crate::core::Db;
use crate::core::ddl;
use crate::core::text::{
    Tag, TaggedLine, collapse_whitespace, display_width, human_size, pad_right, wrap_indented,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: String,
    pub size: Option<String>,
    pub not_null: bool,
    pub default: Option<String>,
    /// position in the primary key, 0 when not part of it
    pub pk: u32,
    /// `None` when the engine could not report hidden columns
    pub hidden: Option<bool>,
}

impl ColumnDescriptor {
    /// Pulls the size or precision out of a declared type:
    /// `VARCHAR(40)` gives `40`, `DECIMAL(10,2)` gives `10,2`.
    pub fn size_of(declared: &str) -> Option<String> {
        let open = declared.find('(')?;
        let close = open + declared[open..].find(')')?;
        let inner: String = declared[open + 1..close]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let numeric = !inner.is_empty()
            && inner.split(',').count() <= 2
            && inner
                .split(',')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));

        numeric.then_some(inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDescriptor {
    pub table: String,
    pub to: String,
    pub from: String,
    pub on_update: String,
    pub on_delete: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDescriptor {
    pub name: String,
    pub sql: String,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    pub table: String,
    pub encoding: Option<String>,
    pub ddl: String,
    pub columns: Vec<ColumnDescriptor>,
    pub has_hidden: bool,
    pub indices: Vec<IndexDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    pub rows: Option<u64>,
    pub size: Option<u64>,
    pub triggers: Vec<TriggerDescriptor>,
}

/// Runs the metadata queries for `table`, in display order.
pub async fn inspect(db: &Db, table: &str) -> SchemaReport {
    let mut report = SchemaReport {
        table: table.to_string(),
        ..SchemaReport::default()
    };

    report.encoding = db.encoding().await.map_err(|e| skipped("encoding", &e)).ok();
    report.ddl = db
        .table_ddl(table)
        .await
        .map_err(|e| skipped("ddl", &e))
        .ok()
        .flatten()
        .unwrap_or_default();

    if let Ok((columns, has_hidden)) = db.columns(table).await.map_err(|e| skipped("columns", &e))
    {
        report.columns = columns;
        report.has_hidden = has_hidden;
    }

    report.indices = db
        .indices(table)
        .await
        .map_err(|e| skipped("indices", &e))
        .unwrap_or_default();
    report.foreign_keys = db
        .foreign_keys(table)
        .await
        .map_err(|e| skipped("foreign keys", &e))
        .unwrap_or_default();
    report.rows = db
        .row_count(table)
        .await
        .map_err(|e| skipped("row count", &e))
        .ok();
    report.size = db.table_size(table).await;
    report.triggers = db
        .triggers(table)
        .await
        .map_err(|e| skipped("triggers", &e))
        .unwrap_or_default();

    report
}

fn skipped(section: &str, error: &crate::Error) {
    tracing::debug!(section, %error, "schema section unavailable");
}

impl SchemaReport {
    /// Lays the report out for a pad `width` columns wide.
    pub fn lines(&self, width: usize) -> Vec<TaggedLine> {
        let mut lines = Vec::new();

        let title = match &self.encoding {
            Some(enc) => format!("Schema: {} (encoding: {enc})", self.table),
            None => format!("Schema: {}", self.table),
        };
        lines.push(TaggedLine::new(Tag::Title, title));

        lines.extend(ddl::format(&self.ddl, width).into_iter().map(TaggedLine::plain));

        lines.push(TaggedLine::blank());
        lines.extend(self.column_lines());

        lines.push(TaggedLine::blank());
        lines.push(TaggedLine::new(Tag::Header, "Indices:"));
        for index in &self.indices {
            let unique = if index.unique { "YES" } else { "NO" };
            let text = format!(
                "{} (unique: {unique}) columns: {}",
                index.name,
                index.columns.join(", ")
            );
            lines.extend(entry(&text, width));
        }

        lines.push(TaggedLine::blank());
        lines.push(TaggedLine::new(Tag::Header, "Foreign keys:"));
        for fk in &self.foreign_keys {
            let text = format!(
                "{}({}) <- {} on_update={} on_delete={}",
                fk.table, fk.to, fk.from, fk.on_update, fk.on_delete
            );
            lines.extend(entry(&text, width));
        }

        lines.push(TaggedLine::blank());
        lines.push(TaggedLine::plain(self.stats()));

        lines.push(TaggedLine::blank());
        lines.push(TaggedLine::new(Tag::Header, "Triggers:"));
        for trigger in &self.triggers {
            let text = format!("{}: {}", trigger.name, collapse_whitespace(&trigger.sql));
            lines.extend(entry(&text, width));
        }

        lines
    }

    /// `Rows: n` plus the size when the engine could report it.
    pub fn stats(&self) -> String {
        let mut stats = match self.rows {
            Some(n) => format!("Rows: {n}"),
            None => "Rows: ?".to_string(),
        };
        if let Some(size) = self.size {
            stats.push_str(&format!(", Size: {}", human_size(size)));
        }
        stats
    }

    fn column_lines(&self) -> Vec<TaggedLine> {
        let mut headers = vec!["Name", "Type", "Limit", "Not Null", "Default", "PK"];
        if self.has_hidden {
            headers.push("Hidden");
        }

        let rows: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| {
                let mut row = vec![
                    c.name.clone(),
                    c.declared_type.clone(),
                    c.size.clone().unwrap_or_default(),
                    yes_no(c.not_null).to_string(),
                    c.default.clone().unwrap_or_default(),
                    if c.pk > 0 { c.pk.to_string() } else { String::new() },
                ];
                if self.has_hidden {
                    row.push(yes_no(c.hidden.unwrap_or(false)).to_string());
                }
                row
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }

        let join = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| pad_right(cell, *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![TaggedLine::new(Tag::Header, join(headers.clone()))];
        for row in &rows {
            lines.push(TaggedLine::plain(join(
                row.iter().map(String::as_str).collect(),
            )));
        }
        lines
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

fn entry(text: &str, width: usize) -> Vec<TaggedLine> {
    wrap_indented(text, width, "  ", "  ")
        .into_iter()
        .map(TaggedLine::plain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column(name: &str, ty: &str, hidden: Option<bool>) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            declared_type: ty.to_string(),
            size: ColumnDescriptor::size_of(ty),
            not_null: false,
            default: None,
            pk: 0,
            hidden,
        }
    }

    fn report() -> SchemaReport {
        SchemaReport {
            table: "users".to_string(),
            encoding: Some("UTF-8".to_string()),
            ddl: "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(40))".to_string(),
            columns: vec![
                ColumnDescriptor {
                    pk: 1,
                    ..column("id", "INTEGER", Some(false))
                },
                column("name", "VARCHAR(40)", Some(false)),
            ],
            has_hidden: true,
            rows: Some(0),
            ..SchemaReport::default()
        }
    }

    fn texts(lines: &[TaggedLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn size_of_reads_numeric_params() {
        assert_eq!(ColumnDescriptor::size_of("VARCHAR(40)"), Some("40".to_string()));
        assert_eq!(ColumnDescriptor::size_of("DECIMAL(10, 2)"), Some("10,2".to_string()));
        assert_eq!(ColumnDescriptor::size_of("TEXT"), None);
        assert_eq!(ColumnDescriptor::size_of("ENUM(a,b)"), None);
        assert_eq!(ColumnDescriptor::size_of(""), None);
    }

    #[test]
    fn empty_table_reports_zero_rows() {
        let lines = report().lines(80);
        assert!(texts(&lines).contains(&"Rows: 0"));
    }

    #[test]
    fn missing_size_leaves_no_suffix() {
        let r = SchemaReport {
            rows: Some(12),
            size: None,
            ..report()
        };
        assert_eq!(r.stats(), "Rows: 12");
        assert!(!texts(&r.lines(80)).iter().any(|l| l.contains("Size")));
    }

    #[test]
    fn size_is_shown_when_known() {
        let r = SchemaReport {
            rows: Some(3),
            size: Some(8192),
            ..report()
        };
        assert_eq!(r.stats(), "Rows: 3, Size: 8.0KB");
    }

    #[test]
    fn failed_count_is_not_zero() {
        let r = SchemaReport {
            rows: None,
            ..report()
        };
        assert_eq!(r.stats(), "Rows: ?");
    }

    #[test]
    fn column_table_is_aligned() {
        let lines = report().lines(80);
        let header = lines.iter().find(|l| l.text.starts_with("Name")).unwrap();
        assert_eq!(header.tag, Tag::Header);
        assert_eq!(header.text, "Name  Type         Limit  Not Null  Default  PK  Hidden");
        assert!(texts(&lines).contains(&"id    INTEGER             NO                 1   NO"));
        assert!(texts(&lines).contains(&"name  VARCHAR(40)  40     NO                     NO"));
    }

    #[test]
    fn hidden_column_omitted_without_xinfo() {
        let mut r = report();
        r.has_hidden = false;
        for c in &mut r.columns {
            c.hidden = None;
        }
        let lines = r.lines(80);
        assert!(!texts(&lines).iter().any(|l| l.contains("Hidden")));
    }

    #[test]
    fn sections_render_entries() {
        let r = SchemaReport {
            indices: vec![IndexDescriptor {
                name: "idx_name".to_string(),
                unique: true,
                columns: vec!["name".to_string(), "id".to_string()],
            }],
            foreign_keys: vec![ForeignKeyDescriptor {
                table: "teams".to_string(),
                to: "id".to_string(),
                from: "team_id".to_string(),
                on_update: "NO ACTION".to_string(),
                on_delete: "CASCADE".to_string(),
            }],
            triggers: vec![TriggerDescriptor {
                name: "touch".to_string(),
                sql: "CREATE TRIGGER touch\nAFTER UPDATE ON users BEGIN SELECT 1; END".to_string(),
            }],
            ..report()
        };
        let lines = r.lines(200);
        let all = texts(&lines);
        assert!(all.contains(&"  idx_name (unique: YES) columns: name, id"));
        assert!(all.contains(&"  teams(id) <- team_id on_update=NO ACTION on_delete=CASCADE"));
        assert!(all.contains(&"  touch: CREATE TRIGGER touch AFTER UPDATE ON users BEGIN SELECT 1; END"));
    }

    #[test]
    fn ddl_is_split_in_report() {
        let lines = report().lines(80);
        assert_eq!(lines[0].text, "Schema: users (encoding: UTF-8)");
        assert_eq!(lines[1].text, "CREATE TABLE users (");
        assert_eq!(lines[2].text, "  id INTEGER PRIMARY KEY,");
        assert_eq!(lines[3].text, "  name VARCHAR(40)");
        assert_eq!(lines[4].text, ")");
    }
}
