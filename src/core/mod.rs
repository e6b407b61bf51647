// core logic - database access, schema inspection, ddl formatting, edit documents

mod db;
pub mod ddl;
pub mod record;
pub mod schema;
pub mod text;

pub use db::{Db, QueryResult, RowSet, SqlOutcome, TableSummary, quote_ident};
pub use record::{EditOutcome, RecordUpdate};
pub use schema::SchemaReport;
