use serde::{Deserialize, Serialize};
use std::fmt;

/// Background color of a cell as written in the export (`bgcolor`).
///
/// Colors are only ever compared for equality, so the token is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellColor(String);

impl CellColor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub color: Option<CellColor>,
    pub comment: Option<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            comment: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(CellColor::new(color));
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Whole cell text, trimmed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Non-empty, trimmed text lines. Exports break multi-entry cells with `<br>`.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim).filter(|line| !line.is_empty())
    }

    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().map(str::trim).unwrap_or("")
    }
}

/// One `<tr>` of the export, before wraps are known.
pub type TableRow = Vec<Cell>;

/// Loader output: every table row in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<TableRow> for Table {
    fn from_iter<I: IntoIterator<Item = TableRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Slice of one grid row that belongs to a single wrap.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub wrap: usize,
    pub cells: Vec<Cell>,
}

impl Part {
    pub fn header(&self) -> Option<&Cell> {
        self.cells.first()
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }
}

/// Plan region regrouped by row index inside a wrap: `rows[r]` holds the
/// r-th row of every wrap, in wrap order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Part>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, row: usize, part: Part) {
        while self.rows.len() <= row {
            self.rows.push(Vec::new());
        }
        self.rows[row].push(part);
    }

    pub fn rows(&self) -> &[Vec<Part>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn part(&self, row: usize, wrap: usize) -> Option<&Part> {
        self.rows
            .get(row)
            .and_then(|parts| parts.iter().find(|part| part.wrap == wrap))
    }

    /// Cell at (`row`, `wrap`, `column`), used for the two header rows.
    pub fn cell(&self, row: usize, wrap: usize, column: usize) -> Option<&Cell> {
        self.part(row, wrap).and_then(|part| part.cell(column))
    }

    pub fn wrap_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|parts| parts.iter().map(|part| part.wrap + 1))
            .max()
            .unwrap_or(0)
    }
}
