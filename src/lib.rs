// litebrowse library - sqlite table browsing, schema inspection and record editing

pub mod cli;
pub mod core;
mod error;
pub mod output;
pub mod tui;

pub use crate::core::{Db, QueryResult, RowSet, SchemaReport, SqlOutcome, TableSummary};
pub use error::Error;
