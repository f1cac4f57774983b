use crate::color_key::ColorKey;
use crate::config::LegendLayout;
use crate::grid::Cell;
use std::collections::HashMap;

/// Color → category label, e.g. practical placement or exam weeks.
pub type CellTypeColorKey = ColorKey<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturerAbbrevMap {
    names: HashMap<String, String>,
}

impl LecturerAbbrevMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, abbrev: impl Into<String>, full_name: impl Into<String>) {
        self.names.insert(abbrev.into(), full_name.into());
    }

    /// Full name for `abbrev`, or `abbrev` itself when the legend lacks it.
    pub fn full_name<'a>(&'a self, abbrev: &'a str) -> &'a str {
        self.names.get(abbrev).map(String::as_str).unwrap_or(abbrev)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The legend below the plan. It is read column by column, so `columns[c][n]`
/// is the c-th cell of the n-th legend row that has at least `c + 1` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    columns: Vec<Vec<Cell>>,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, cells: &[Cell]) {
        for (index, cell) in cells.iter().enumerate() {
            if index >= self.columns.len() {
                self.columns.push(Vec::new());
            }
            self.columns[index].push(cell.clone());
        }
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        self.columns.get(column).and_then(|cells| cells.get(row))
    }

    pub fn column(&self, column: usize) -> &[Cell] {
        self.columns.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cell_types(&self, layout: &LegendLayout) -> CellTypeColorKey {
        let mut key = CellTypeColorKey::new();
        for row in layout.category_first_row..=layout.category_last_row {
            let swatch = self.cell(layout.swatch_column, row).and_then(|cell| cell.color.clone());
            let name = self.cell(layout.name_column, row).map(Cell::trimmed);
            match (swatch, name) {
                (Some(color), Some(name)) if !name.is_empty() => {
                    tracing::debug!(%color, name, "legend cell type");
                    key.insert(color, name.to_string());
                }
                _ => tracing::debug!(row, "legend cell type row missing"),
            }
        }
        key
    }

    pub fn lecturers(&self, layout: &LegendLayout) -> LecturerAbbrevMap {
        let mut lecturers = LecturerAbbrevMap::new();
        for (index, cell) in self.column(layout.lecturer_abbrev_column).iter().enumerate() {
            let abbrev = cell.trimmed();
            if abbrev.is_empty() || abbrev == layout.lecturer_header {
                continue;
            }
            let full_name = self
                .cell(layout.lecturer_name_column, index)
                .map(Cell::trimmed)
                .unwrap_or_default();
            if full_name.is_empty() {
                continue;
            }
            lecturers.insert(abbrev, full_name);
        }
        lecturers
    }
}
