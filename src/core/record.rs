// edit document - one record as a json object the user edits in $EDITOR

use crate::Error;
use crate::core::Db;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// the update was written; `changed` columns got a new value
    Saved { changed: usize },
    /// the document could not be read back, nothing was written
    Discarded,
}

/// Serializes a record to the text handed to the editor: a pretty-printed
/// json object keyed by column name, in column order.
pub fn to_document(columns: &[String], record: &[Value]) -> Result<String, Error> {
    let object: Map<String, Value> = columns
        .iter()
        .cloned()
        .zip(record.iter().cloned())
        .collect();

    let mut text = serde_json::to_string_pretty(&Value::Object(object))?;
    text.push('\n');
    Ok(text)
}

/// Parses an edited document. Anything other than a json object is treated
/// as a malformed edit.
pub fn parse_document(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            tracing::debug!("edited document is not an object");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "edited document does not parse");
            None
        }
    }
}

/// Column assignments for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
    pub rowid: i64,
    pub assignments: Vec<(String, Value)>,
}

impl RecordUpdate {
    /// Keeps only keys that are existing columns, in column order. Columns
    /// missing from the edit stay as they are; unknown keys are dropped.
    pub fn merge(columns: &[String], rowid: i64, edited: &Map<String, Value>) -> Self {
        let assignments = columns
            .iter()
            .filter_map(|column| {
                edited
                    .get(column)
                    .map(|value| (column.clone(), value.clone()))
            })
            .collect();

        Self { rowid, assignments }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Names of assigned columns whose value differs from `original`.
    pub fn changed<'a>(&'a self, columns: &[String], original: &[Value]) -> Vec<&'a str> {
        self.assignments
            .iter()
            .filter(|(column, value)| differs(columns, original, column, value))
            .map(|(column, _)| column.as_str())
            .collect()
    }

    /// Drops assignments that would write back the value already shown.
    /// Cells rendered lossily (blobs) are never rewritten unless edited.
    pub fn retain_changed(&mut self, columns: &[String], original: &[Value]) {
        self.assignments
            .retain(|(column, value)| differs(columns, original, column, value));
    }
}

fn differs(columns: &[String], original: &[Value], column: &str, value: &Value) -> bool {
    columns
        .iter()
        .position(|c| c == column)
        .and_then(|i| original.get(i))
        .is_none_or(|old| old != value)
}

/// Reconciles an edited document with the record it came from and writes
/// the result. Malformed documents leave the row untouched.
pub async fn apply_edit(
    db: &Db,
    table: &str,
    columns: &[String],
    record: &[Value],
    rowid: i64,
    edited: &str,
) -> Result<EditOutcome, Error> {
    let Some(document) = parse_document(edited) else {
        return Ok(EditOutcome::Discarded);
    };

    let mut update = RecordUpdate::merge(columns, rowid, &document);
    update.retain_changed(columns, record);
    if !update.is_empty() {
        db.update_row(table, update.rowid, &update.assignments).await?;
    }

    Ok(EditOutcome::Saved {
        changed: update.assignments.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn document_keeps_column_order() {
        let text = to_document(&cols(&["z", "a"]), &[json!(1), json!("x")]).unwrap();
        assert_eq!(text, "{\n  \"z\": 1,\n  \"a\": \"x\"\n}\n");
    }

    #[test]
    fn document_keeps_unicode_readable() {
        let text = to_document(&cols(&["name"]), &[json!("Zoë 日本")]).unwrap();
        assert!(text.contains("Zoë 日本"));
    }

    #[test]
    fn unchanged_round_trip_changes_nothing() {
        let columns = cols(&["id", "name", "score", "note", "flag"]);
        let record = vec![json!(7), json!("ann"), json!(1.25), Value::Null, json!(0)];

        let text = to_document(&columns, &record).unwrap();
        let parsed = parse_document(&text).unwrap();
        let update = RecordUpdate::merge(&columns, 7, &parsed);

        assert_eq!(update.assignments.len(), columns.len());
        assert!(update.changed(&columns, &record).is_empty());
    }

    #[test]
    fn merge_ignores_unknown_and_skips_missing() {
        let columns = cols(&["a", "b", "c"]);
        let edited = parse_document(r#"{"a": 1, "d": 2}"#).unwrap();
        let update = RecordUpdate::merge(&columns, 3, &edited);

        assert_eq!(update.rowid, 3);
        assert_eq!(update.assignments, vec![("a".to_string(), json!(1))]);
    }

    #[test]
    fn merge_follows_column_order() {
        let columns = cols(&["a", "b"]);
        let edited = parse_document(r#"{"b": "two", "a": "one"}"#).unwrap();
        let update = RecordUpdate::merge(&columns, 1, &edited);
        let names: Vec<&str> = update.assignments.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn changed_reports_only_differences() {
        let columns = cols(&["a", "b"]);
        let original = vec![json!(1), json!("x")];
        let edited = parse_document(r#"{"a": 1, "b": "y"}"#).unwrap();
        let update = RecordUpdate::merge(&columns, 1, &edited);
        assert_eq!(update.changed(&columns, &original), vec!["b"]);
    }

    #[test]
    fn retain_changed_keeps_only_edits() {
        let columns = cols(&["a", "b", "c"]);
        let original = vec![json!(1), json!("\u{0}\u{fffd}"), json!("x")];
        let edited = parse_document(r#"{"a": 1, "b": "\u0000\ufffd", "c": "y"}"#).unwrap();
        let mut update = RecordUpdate::merge(&columns, 1, &edited);
        update.retain_changed(&columns, &original);
        assert_eq!(update.assignments, vec![("c".to_string(), json!("y"))]);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert_eq!(parse_document("{\"a\": "), None);
        assert_eq!(parse_document("[1, 2]"), None);
        assert_eq!(parse_document(""), None);
    }

    #[test]
    fn empty_object_merges_to_nothing() {
        let edited = parse_document("{}").unwrap();
        assert!(RecordUpdate::merge(&cols(&["a"]), 1, &edited).is_empty());
    }
}
