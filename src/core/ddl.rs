// CREATE TABLE pretty-printer
// splits the column list on top-level commas so DECIMAL(10,2) or
// FOREIGN KEY (a,b) stay in one piece

use super::text::{collapse_whitespace as collapse, wrap, wrap_indented};

const INDENT: &str = "  ";
const CONTINUATION: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// everything before the opening paren, e.g. `CREATE TABLE t`
    pub head: String,
    /// column and constraint definitions, trimmed, without separators
    pub fragments: Vec<String>,
    /// text after the closing paren, e.g. `WITHOUT ROWID`
    pub trailer: String,
}

/// Splits a `CREATE TABLE name (body) trailer` statement.
///
/// Returns `None` when the text has no parenthesised body or the parens don't
/// balance; callers fall back to plain wrapping.
pub fn split(ddl: &str) -> Option<CreateTable> {
    let mut open = None;
    let mut depth = 0usize;
    let mut commas = Vec::new();
    let mut quote: Option<char> = None;

    for (i, c) in ddl.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '[' => quote = Some(']'),
            '(' => {
                if open.is_none() {
                    open = Some(i);
                } else {
                    depth += 1;
                }
            }
            ')' if open.is_some() => {
                if depth == 0 {
                    let table = build(ddl, open? + 1, i, &commas);
                    return is_create(&table.head).then_some(table);
                }
                depth -= 1;
            }
            ',' if open.is_some() && depth == 0 => commas.push(i),
            _ => {}
        }
    }

    None
}

fn build(ddl: &str, start: usize, close: usize, commas: &[usize]) -> CreateTable {
    let mut fragments = Vec::new();
    let mut from = start;
    for &comma in commas.iter().chain(std::iter::once(&close)) {
        let piece = ddl[from..comma].trim();
        if !piece.is_empty() {
            fragments.push(piece.to_string());
        }
        from = comma + 1;
    }

    CreateTable {
        head: ddl[..start - 1].trim().to_string(),
        fragments,
        trailer: ddl[close + 1..].trim().to_string(),
    }
}

/// Formats DDL for a terminal `width` columns wide.
pub fn format(ddl: &str, width: usize) -> Vec<String> {
    let Some(table) = split(ddl) else {
        return wrap(ddl, width);
    };

    // stored ddl keeps the user's original newlines and indentation
    let mut lines = wrap(&format!("{} (", collapse(&table.head)), width);

    let last = table.fragments.len().saturating_sub(1);
    for (i, fragment) in table.fragments.iter().enumerate() {
        let mut text = collapse(fragment);
        if i < last {
            text.push(',');
        }
        lines.extend(wrap_indented(&text, width, INDENT, CONTINUATION));
    }

    if table.trailer.is_empty() {
        lines.push(")".to_string());
    } else {
        lines.extend(wrap(&format!(") {}", collapse(&table.trailer)), width));
    }

    lines
}

fn is_create(head: &str) -> bool {
    let upper = head.to_uppercase();
    upper.starts_with("CREATE") && upper.contains("TABLE")
}
