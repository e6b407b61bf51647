// console output for the sql prompt - printed while the ui is suspended

use crate::Error;
use crate::core::SqlOutcome;
use crate::tui::grid::row_text;

pub struct Output;

impl Output {
    /// Lines describing a statement's outcome, result rows included.
    pub fn lines(result: &Result<SqlOutcome, Error>) -> Vec<String> {
        match result {
            Ok(SqlOutcome::Rows(rows)) => {
                let mut lines = Vec::with_capacity(rows.rows.len() + 2);
                lines.push(rows.columns.join(" | "));
                lines.extend(rows.rows.iter().map(|row| row_text(row)));
                lines.push(format!("{} row(s) returned", rows.row_count));
                lines
            }
            Ok(SqlOutcome::Done { rows_affected }) => vec![format!(
                "Query executed successfully. ({rows_affected} row(s) affected)"
            )],
            Err(Error::Database(e)) => vec![format!("SQL error: {e}")],
            Err(e) => vec![format!("SQL error: {e}")],
        }
    }

    pub fn print(result: &Result<SqlOutcome, Error>) {
        for line in Self::lines(result) {
            println!("{line}");
        }
    }

    /// One-line summary for the status log.
    pub fn summary(result: &Result<SqlOutcome, Error>) -> String {
        match result {
            Ok(SqlOutcome::Rows(rows)) => format!("query returned {} row(s)", rows.row_count),
            Ok(SqlOutcome::Done { rows_affected }) => {
                format!("statement ran, {rows_affected} row(s) affected")
            }
            Err(e) => format!("sql failed: {e}"),
        }
    }
}
