// sqlite access - table listing, row loading, mutations and metadata pragmas
// everything goes through one pooled connection

use crate::Error;
use crate::core::schema::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TriggerDescriptor,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Executor, Row, Statement};
use std::path::Path;

pub struct Db {
    pool: SqlitePool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub name: String,
    pub rows: Option<u64>,
    pub size: Option<u64>,
}

/// Rows of one table with their rowids, in the order sqlite returned them.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub records: Vec<Vec<Value>>,
    pub rowids: Vec<i64>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
}

#[derive(Debug, Clone)]
pub enum SqlOutcome {
    Rows(QueryResult),
    Done { rows_affected: u64 },
}

impl Db {
    pub async fn connect(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::DatabaseNotFound(path.to_path_buf()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);

        // one connection: statements are strictly sequential
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::info!(path = %path.display(), "opened database");
        Ok(Self { pool })
    }

    pub async fn tables(&self) -> Result<Vec<String>, Error> {
        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(tables.into_iter().map(|(name,)| name).collect())
    }

    pub async fn row_count(&self, table: &str) -> Result<u64, Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    /// Bytes used by the table according to the `dbstat` virtual table.
    /// `None` when sqlite was built without it.
    pub async fn table_size(&self, table: &str) -> Option<u64> {
        let size: Result<(Option<i64>,), _> =
            sqlx::query_as("SELECT SUM(pgsize) FROM dbstat WHERE name = ?")
                .bind(table)
                .fetch_one(&self.pool)
                .await;

        match size {
            Ok((size,)) => size.map(|s| s.max(0) as u64),
            Err(e) => {
                tracing::debug!(table, error = %e, "size introspection unavailable");
                None
            }
        }
    }

    pub async fn table_summaries(&self) -> Result<Vec<TableSummary>, Error> {
        let mut summaries = Vec::new();
        for name in self.tables().await? {
            let rows = match self.row_count(&name).await {
                Ok(n) => Some(n),
                Err(e) => {
                    tracing::debug!(table = %name, error = %e, "row count failed");
                    None
                }
            };
            let size = self.table_size(&name).await;
            summaries.push(TableSummary { name, rows, size });
        }
        Ok(summaries)
    }

    pub async fn load_rows(&self, table: &str) -> Result<RowSet, Error> {
        let sql = format!("SELECT rowid AS __rowid__, * FROM {}", quote_ident(table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let Some(first) = rows.first() else {
            // no rows to read names from
            let columns = self.column_names(table).await?;
            return Ok(RowSet {
                columns,
                ..RowSet::default()
            });
        };

        let columns: Vec<String> = first
            .columns()
            .iter()
            .skip(1)
            .map(|c| c.name().to_string())
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        let mut rowids = Vec::with_capacity(rows.len());
        for row in &rows {
            rowids.push(row.try_get::<i64, _>(0)?);
            records.push((1..=columns.len()).map(|i| row_value(row, i)).collect());
        }

        Ok(RowSet {
            columns,
            records,
            rowids,
        })
    }

    pub async fn column_names(&self, table: &str) -> Result<Vec<String>, Error> {
        let sql = format!("PRAGMA table_info({})", quote_ident(table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| r.try_get::<String, _>("name").map_err(Error::from))
            .collect()
    }

    pub async fn delete_row(&self, table: &str, rowid: i64) -> Result<u64, Error> {
        let sql = format!("DELETE FROM {} WHERE rowid = ?", quote_ident(table));
        let done = sqlx::query(&sql).bind(rowid).execute(&self.pool).await?;
        tracing::info!(table, rowid, "deleted row");
        Ok(done.rows_affected())
    }

    /// Writes `assignments` to the row with `rowid`. Nothing is issued when
    /// there is nothing to assign.
    pub async fn update_row(
        &self,
        table: &str,
        rowid: i64,
        assignments: &[(String, Value)],
    ) -> Result<u64, Error> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let set = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {set} WHERE rowid = ?", quote_ident(table));

        let mut query = sqlx::query(&sql);
        for (_, value) in assignments {
            query = bind_value(query, value);
        }
        let done = query.bind(rowid).execute(&self.pool).await?;

        tracing::info!(table, rowid, columns = assignments.len(), "updated row");
        Ok(done.rows_affected())
    }

    /// Runs a statement typed by the user.
    pub async fn execute(&self, sql: &str) -> Result<SqlOutcome, Error> {
        let statement = (&self.pool).prepare(sql).await?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        if columns.is_empty() {
            let done = statement.query().execute(&self.pool).await?;
            return Ok(SqlOutcome::Done {
                rows_affected: done.rows_affected(),
            });
        }

        let rows = statement.query().fetch_all(&self.pool).await?;
        let rows: Vec<Vec<Value>> = rows
            .iter()
            .map(|row| (0..columns.len()).map(|i| row_value(row, i)).collect())
            .collect();
        let row_count = rows.len();

        Ok(SqlOutcome::Rows(QueryResult {
            columns,
            rows,
            row_count,
        }))
    }

    pub async fn encoding(&self) -> Result<String, Error> {
        let (encoding,): (String,) = sqlx::query_as("PRAGMA encoding")
            .fetch_one(&self.pool)
            .await?;
        Ok(encoding)
    }

    pub async fn table_ddl(&self, table: &str) -> Result<Option<String>, Error> {
        let ddl: Option<(Option<String>,)> =
            sqlx::query_as("SELECT sql FROM sqlite_master WHERE type='table' AND name = ?")
                .bind(table)
                .fetch_optional(&self.pool)
                .await?;
        Ok(ddl.and_then(|(sql,)| sql))
    }

    /// Column metadata, preferring `table_xinfo` (which reports hidden and
    /// generated columns). The flag says whether the extended form worked.
    pub async fn columns(&self, table: &str) -> Result<(Vec<ColumnDescriptor>, bool), Error> {
        let extended = format!("PRAGMA table_xinfo({})", quote_ident(table));
        match sqlx::query(&extended).fetch_all(&self.pool).await {
            Ok(rows) => Ok((read_columns(&rows, true)?, true)),
            Err(e) => {
                tracing::debug!(table, error = %e, "table_xinfo unavailable");
                let basic = format!("PRAGMA table_info({})", quote_ident(table));
                let rows = sqlx::query(&basic).fetch_all(&self.pool).await?;
                Ok((read_columns(&rows, false)?, false))
            }
        }
    }

    pub async fn indices(&self, table: &str) -> Result<Vec<IndexDescriptor>, Error> {
        let sql = format!("PRAGMA index_list({})", quote_ident(table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut indices = Vec::new();
        for row in &rows {
            let name: String = row.try_get("name")?;
            let unique: i64 = row.try_get("unique")?;

            let sql = format!("PRAGMA index_info({})", quote_ident(&name));
            let members = sqlx::query(&sql).fetch_all(&self.pool).await?;
            let columns = members
                .iter()
                .map(|m| {
                    // expression indexes have no column name
                    m.try_get::<Option<String>, _>("name")
                        .map(|n| n.unwrap_or_else(|| "<expr>".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            indices.push(IndexDescriptor {
                name,
                unique: unique != 0,
                columns,
            });
        }
        Ok(indices)
    }

    pub async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyDescriptor>, Error> {
        let sql = format!("PRAGMA foreign_key_list({})", quote_ident(table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<ForeignKeyDescriptor, Error> {
                Ok(ForeignKeyDescriptor {
                    table: row.try_get("table")?,
                    // NULL when the parent's primary key is implied
                    to: row.try_get::<Option<String>, _>("to")?.unwrap_or_default(),
                    from: row.try_get("from")?,
                    on_update: row.try_get("on_update")?,
                    on_delete: row.try_get("on_delete")?,
                })
            })
            .collect()
    }

    pub async fn triggers(&self, table: &str) -> Result<Vec<TriggerDescriptor>, Error> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT name, sql FROM sqlite_master WHERE type='trigger' AND tbl_name = ? ORDER BY name",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, sql)| TriggerDescriptor {
                name,
                sql: sql.unwrap_or_default(),
            })
            .collect())
    }
}

/// Quotes an identifier for interpolation into sql text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn read_columns(rows: &[SqliteRow], extended: bool) -> Result<Vec<ColumnDescriptor>, Error> {
    rows.iter()
        .map(|row| -> Result<ColumnDescriptor, Error> {
            let declared: Option<String> = row.try_get("type")?;
            let declared = declared.unwrap_or_default();
            let hidden = if extended {
                Some(row.try_get::<i64, _>("hidden")? != 0)
            } else {
                None
            };

            Ok(ColumnDescriptor {
                name: row.try_get("name")?,
                size: ColumnDescriptor::size_of(&declared),
                declared_type: declared,
                not_null: row.try_get::<i64, _>("notnull")? != 0,
                default: row.try_get("dflt_value")?,
                pk: row.try_get::<i64, _>("pk")?.max(0) as u32,
                hidden,
            })
        })
        .collect()
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) => query.bind(s.clone()),
        // nested json is stored as its text
        other => query.bind(other.to_string()),
    }
}

// convert sqlite values to json, tolerating bad utf-8 like the row view expects
fn row_value(row: &SqliteRow, index: usize) -> Value {
    use sqlx::ValueRef;

    if row.try_get_raw(index).map(|v| v.is_null()).unwrap_or(true) {
        return Value::Null;
    }

    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Value::Number(v.into());
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Value::String(v);
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        return Value::String(String::from_utf8_lossy(&v).into_owned());
    }

    Value::String("<unsupported>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
