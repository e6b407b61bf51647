// grid renderer - draws tagged lines into a fixed character area
// header lines stick to the top, footer lines to the bottom, the body scrolls

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use serde_json::Value;

use crate::core::text::{Tag, TaggedLine, single_line, wrap};
use crate::tui::theme::Theme;
use crate::tui::viewport::Viewport;

pub struct Grid<'a> {
    header: &'a [TaggedLine],
    body: &'a [TaggedLine],
    footer: &'a [TaggedLine],
    offset: usize,
    theme: &'a Theme,
}

impl<'a> Grid<'a> {
    pub fn new(body: &'a [TaggedLine], theme: &'a Theme) -> Self {
        Self {
            header: &[],
            body,
            footer: &[],
            offset: 0,
            theme,
        }
    }

    pub fn header(mut self, header: &'a [TaggedLine]) -> Self {
        self.header = header;
        self
    }

    pub fn footer(mut self, footer: &'a [TaggedLine]) -> Self {
        self.footer = footer;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Width available to text on a line `width` cells wide; the last column is
/// left blank.
pub fn text_width(width: u16) -> usize {
    (width as usize).saturating_sub(1).max(1)
}

impl Widget for Grid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let height = area.height as usize;
        let footer_rows = self.footer.len().min(height);
        let header_rows = self.header.len().min(height - footer_rows);
        let body_rows = height - footer_rows - header_rows;

        let body = self.body.iter().skip(self.offset).take(body_rows);
        let lines = self.header.iter().take(header_rows).chain(body);
        for (y, line) in (area.y..).zip(lines) {
            draw_line(buf, area, y, line, self.theme);
        }

        let footer_top = area.bottom() - footer_rows as u16;
        let footer = &self.footer[self.footer.len() - footer_rows..];
        for (y, line) in (footer_top..).zip(footer) {
            draw_line(buf, area, y, line, self.theme);
        }
    }
}

fn draw_line(buf: &mut Buffer, area: Rect, y: u16, line: &TaggedLine, theme: &Theme) {
    let style = theme.tag(line.tag);
    if line.tag == Tag::Selected {
        buf.set_style(Rect::new(area.x, y, area.width, 1), style);
    }
    buf.set_stringn(area.x, y, &line.text, text_width(area.width), style);
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => value.to_string(),
    }
}

/// One record as a single display line.
pub fn row_text(record: &[Value]) -> String {
    let cells: Vec<String> = record.iter().map(format_value).collect();
    single_line(&cells.join(" | "))
}

/// Physical lines for the rows visible under `viewport`, at most `height` of
/// them. In wrap mode a row may take several lines, all tagged as selected
/// when the row is.
pub fn row_lines(
    rows: &[String],
    viewport: &Viewport,
    width: usize,
    height: usize,
) -> Vec<TaggedLine> {
    let mut lines = Vec::new();

    for (index, row) in rows.iter().enumerate().skip(viewport.offset()) {
        if lines.len() >= height {
            break;
        }

        let tag = if index == viewport.selected() {
            Tag::Selected
        } else {
            Tag::Plain
        };

        if viewport.wrap() {
            let mut parts = wrap(row, width);
            if parts.is_empty() {
                parts.push(String::new());
            }
            for part in parts.into_iter().take(height - lines.len()) {
                lines.push(TaggedLine::new(tag, part));
            }
        } else {
            lines.push(TaggedLine::new(tag, row.clone()));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::ThemeKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn theme() -> Theme {
        Theme::from_kind(ThemeKind::Dark)
    }

    fn plain(lines: &[&str]) -> Vec<TaggedLine> {
        lines.iter().map(|l| TaggedLine::plain(*l)).collect()
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn footer_takes_last_row() {
        let theme = theme();
        let body = plain(&["a", "b", "c", "d", "e"]);
        let footer = plain(&["help"]);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);

        Grid::new(&body, &theme)
            .footer(&footer)
            .render(area, &mut buf);

        assert_eq!(row(&buf, 0), "a         ");
        assert_eq!(row(&buf, 2), "c         ");
        assert_eq!(row(&buf, 3), "help      ");
    }

    #[test]
    fn offset_and_header() {
        let theme = theme();
        let header = plain(&["title"]);
        let body = plain(&["r0", "r1", "r2", "r3"]);
        let area = Rect::new(0, 0, 8, 3);
        let mut buf = Buffer::empty(area);

        Grid::new(&body, &theme)
            .header(&header)
            .offset(2)
            .render(area, &mut buf);

        assert_eq!(row(&buf, 0), "title   ");
        assert_eq!(row(&buf, 1), "r2      ");
        assert_eq!(row(&buf, 2), "r3      ");
    }

    #[test]
    fn long_lines_are_clipped() {
        let theme = theme();
        let body = plain(&["0123456789abcdef"]);
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);

        Grid::new(&body, &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "01234 ");
    }

    #[test]
    fn tiny_areas_do_not_panic() {
        let theme = theme();
        let header = plain(&["h1", "h2"]);
        let body = plain(&["x"; 50]);
        let footer = plain(&["status", "help"]);

        for (w, h) in [(0, 0), (1, 1), (3, 1), (10, 2), (10, 3)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            Grid::new(&body, &theme)
                .header(&header)
                .footer(&footer)
                .offset(1000)
                .render(area, &mut buf);
        }

        // footer wins when space runs out
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        Grid::new(&body, &theme)
            .header(&header)
            .footer(&footer)
            .render(area, &mut buf);
        assert_eq!(row(&buf, 0), "help  ");
    }

    #[test]
    fn draws_inside_offset_area_only() {
        let theme = theme();
        let body = plain(&["wide line of text"]);
        let full = Rect::new(0, 0, 12, 4);
        let area = Rect::new(2, 1, 5, 2);
        let mut buf = Buffer::empty(full);

        Grid::new(&body, &theme).render(area, &mut buf);

        assert_eq!(row(&buf, 0), " ".repeat(12));
        assert_eq!(row(&buf, 1), "  wide      ");
        assert_eq!(row(&buf, 3), " ".repeat(12));
    }

    #[test]
    fn row_text_joins_cells() {
        let text = row_text(&[json!(1), json!("a\nb"), Value::Null, json!(2.5)]);
        assert_eq!(text, "1 | a b | NULL | 2.5");
    }

    #[test]
    fn row_lines_fixed_mode_tags_selection() {
        let rows: Vec<String> = (0..10).map(|i| format!("row {i}")).collect();
        let mut v = Viewport::default();
        for _ in 0..4 {
            v.down(rows.len(), 3);
        }
        let lines = row_lines(&rows, &v, 20, 3);

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["row 2", "row 3", "row 4"]);
        assert_eq!(lines[2].tag, Tag::Selected);
        assert_eq!(lines[0].tag, Tag::Plain);
    }

    #[test]
    fn row_lines_wrap_mode_expands_rows() {
        let rows = vec!["alpha beta gamma delta".to_string(), "short".to_string()];
        let mut v = Viewport::default();
        v.toggle_wrap(rows.len(), 5);
        let lines = row_lines(&rows, &v, 11, 10);

        assert!(lines.len() >= 3);
        assert!(lines[..lines.len() - 1].iter().all(|l| l.tag == Tag::Selected));
        assert_eq!(lines.last().unwrap().text, "short");
        assert_eq!(lines.last().unwrap().tag, Tag::Plain);
    }

    #[test]
    fn row_lines_never_exceed_height() {
        let rows = vec!["word ".repeat(100)];
        let mut v = Viewport::default();
        v.toggle_wrap(1, 4);
        assert_eq!(row_lines(&rows, &v, 10, 4).len(), 4);
        assert!(row_lines(&[], &v, 10, 4).is_empty());
    }
}
