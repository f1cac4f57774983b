//! Loads the spreadsheet's HTML export into a [`Table`].
//!
//! Every `<tr>` of the document becomes one table row, in document order, and
//! every direct `<td>`/`<th>` child one cell. The background color comes from
//! the `bgcolor` attribute. Cell text is taken from the text nodes directly
//! below `<font>` elements, which is where the export puts the visible text;
//! cells without `<font>` fall back to their plain text. Text inside nested
//! `<comment>` elements is the cell comment and never part of the text.

use crate::grid::{Cell, CellColor, Table, TableRow};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::io;
use std::path::Path;

const COMMENT_TAG: &str = "comment";

pub fn load_table_from_html(markup: &str) -> Table {
    let document = Html::parse_document(markup);
    let Ok(row_selector) = Selector::parse("tr") else {
        return Table::default();
    };

    document
        .select(&row_selector)
        .map(|row| direct_cells(&row).into_iter().map(cell_from_element).collect::<TableRow>())
        .collect()
}

pub fn load_table_from_html_file<P: AsRef<Path>>(path: P) -> io::Result<Table> {
    let bytes = fs::read(path)?;
    // Spreadsheet exports are frequently windows-1252; keep what decodes.
    let markup = String::from_utf8_lossy(&bytes);
    Ok(load_table_from_html(&markup))
}

fn direct_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| matches!(child.value().name(), "td" | "th"))
        .collect()
}

fn cell_from_element(element: ElementRef<'_>) -> Cell {
    let mut lines = Vec::new();
    collect_font_text(element, &mut lines);
    if lines.is_empty() {
        collect_plain_text(element, &mut lines);
    }

    let mut comments = Vec::new();
    collect_comments(element, &mut comments);
    let comment = comments.join(" ");

    Cell {
        text: lines.join("\n"),
        color: element.value().attr("bgcolor").map(CellColor::new),
        comment: (!comment.trim().is_empty()).then(|| comment.trim().to_string()),
    }
}

fn collect_font_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        match child.value().name() {
            COMMENT_TAG => {}
            "font" => {
                for node in child.children() {
                    if let Some(text) = node.value().as_text() {
                        push_line(lines, text);
                    }
                }
                collect_font_text(child, lines);
            }
            _ => collect_font_text(child, lines),
        }
    }
}

fn collect_plain_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for node in element.children() {
        if let Some(text) = node.value().as_text() {
            push_line(lines, text);
        } else if let Some(child) = ElementRef::wrap(node) {
            if child.value().name() != COMMENT_TAG {
                collect_plain_text(child, lines);
            }
        }
    }
}

fn collect_comments(element: ElementRef<'_>, comments: &mut Vec<String>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        if child.value().name() == COMMENT_TAG {
            comments.push(child.text().collect::<String>().trim().to_string());
        } else {
            collect_comments(child, comments);
        }
    }
}

fn push_line(lines: &mut Vec<String>, text: &str) {
    let text = text.replace('\u{a0}', " ");
    let text = text.trim();
    if !text.is_empty() {
        lines.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cells_colors_and_comments() {
        let table = load_table_from_html(
            r##"<table>
                <tr><td></td><td>2016/KW 9</td></tr>
                <tr><td bgcolor="#FFCC00"><font>FS151+BSc (FST) d</font></td>
                    <td><font>Mo 08:00 Mathe</font><br><font>Di 10:00 BWL</font><comment>B.Sc. Prüfung</comment></td></tr>
            </table>"##,
        );

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1].text, "2016/KW 9");
        let header = &table.rows[1][0];
        assert_eq!(header.text, "FS151+BSc (FST) d");
        assert_eq!(header.color.as_ref().map(|c| c.as_str()), Some("#FFCC00"));

        let entry = &table.rows[1][1];
        assert_eq!(entry.lines().collect::<Vec<_>>(), vec!["Mo 08:00 Mathe", "Di 10:00 BWL"]);
        assert_eq!(entry.comment.as_deref(), Some("B.Sc. Prüfung"));
    }
}
