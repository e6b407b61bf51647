// text helpers shared by the schema view, ddl formatter and row view

use unicode_width::UnicodeWidthStr;

/// Word-wraps `text` to `width` columns. Blank input yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    wrap_indented(text, width, "", "")
}

/// Word-wraps with separate indents for the first and following lines.
/// The indents count against `width`.
pub fn wrap_indented(text: &str, width: usize, first: &str, rest: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // textwrap needs room for at least one glyph past the indent
    let min = first.width().max(rest.width()) + 1;
    let options = textwrap::Options::new(width.max(min))
        .initial_indent(first)
        .subsequent_indent(rest);

    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Display attribute attached to a composed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tag {
    #[default]
    Plain,
    Title,
    Header,
    Selected,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    pub tag: Tag,
    pub text: String,
}

impl TaggedLine {
    pub fn new(tag: Tag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Tag::Plain, text)
    }

    pub fn blank() -> Self {
        Self::plain("")
    }
}

/// Collapses runs of whitespace, including newlines, into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces control characters (newlines, tabs, ...) with spaces so a value
/// renders on a single terminal line.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Left-aligns `text` in a field of `width` display columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Right-aligns `text` in a field of `width` display columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{text}", " ".repeat(fill))
}

pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Approximate storage size as shown in the table list and schema view.
pub fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes}B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_blank_is_empty() {
        assert!(wrap("", 20).is_empty());
        assert!(wrap("   ", 20).is_empty());
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("alpha beta gamma delta epsilon", 11);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width() <= 11));
    }

    #[test]
    fn wrap_indented_keeps_indents() {
        let lines = wrap_indented("one two three four five six", 12, "  ", "    ");
        assert!(lines[0].starts_with("  one"));
        assert!(lines[1..].iter().all(|l| l.starts_with("    ")));
    }

    #[test]
    fn wrap_survives_tiny_width() {
        let lines = wrap_indented("abcdef", 0, "  ", "    ");
        assert!(!lines.is_empty());
    }

    #[test]
    fn collapse_joins_lines() {
        assert_eq!(collapse_whitespace("  a\n   b\tc  "), "a b c");
    }

    #[test]
    fn single_line_strips_controls() {
        assert_eq!(single_line("a\nb\tc"), "a b c");
    }

    #[test]
    fn padding() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_left("ab", 4), "  ab");
        assert_eq!(pad_left("abcdef", 4), "abcdef");
    }

    #[test]
    fn human_size_thresholds() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(1023), "1023B");
        assert_eq!(human_size(1024), "1.0KB");
        assert_eq!(human_size(1536), "1.5KB");
        assert_eq!(human_size(1024 * 1024), "1.0MB");
        assert_eq!(human_size(5 * 1024 * 1024 + 512 * 1024), "5.5MB");
    }
}
