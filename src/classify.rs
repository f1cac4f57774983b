//! First pass over the table: plan/legend split, wrap detection, element kinds.

use crate::class::{CLASS_CELL_RE, Class};
use crate::color_key::{Cohort, JahrgangColorKeys};
use crate::config::ExtractorConfig;
use crate::grid::{Grid, Part, Table};
use crate::legend::Legend;
use regex::Regex;
use std::sync::LazyLock;

/// Year and calendar week, e.g. `2016/KW 23`.
pub(crate) static CALENDAR_WEEK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}/KW ?\d{1,2}").expect("valid calendar week regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Plan,
    /// Terminal: once the legend starts every later row belongs to it.
    Legend,
}

/// Structural role of one element (cell) of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Row 0: `YYYY/KW WW`.
    CalendarWeek,
    /// Row 1: `DD.MM-DD.MM`.
    DateRange,
    /// Row 1 of the column holding class headers.
    GroupHeader,
    /// Data row cell naming a class, e.g. `FS151+BSc (FST) d`.
    ClassHeader,
    Plain,
}

pub fn classify_element(row: usize, text: &str, group_header_label: &str) -> ElementKind {
    let text = text.trim();
    match row {
        0 => ElementKind::CalendarWeek,
        1 if text == group_header_label => ElementKind::GroupHeader,
        1 => ElementKind::DateRange,
        _ if Class::is_class_cell(text) => ElementKind::ClassHeader,
        _ => ElementKind::Plain,
    }
}

/// Everything the second pass needs, collected in one forward sweep.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub grid: Grid,
    pub legend: Legend,
    pub jahrgang_keys: JahrgangColorKeys,
}

/// Tracks region, wrap and row-in-wrap while rows stream by.
#[derive(Debug)]
pub struct RowClassifier<'a> {
    config: &'a ExtractorConfig,
    region: Region,
    wrap: Option<usize>,
    row: usize,
}

impl<'a> RowClassifier<'a> {
    pub fn new(config: &'a ExtractorConfig) -> Self {
        Self {
            config,
            region: Region::Plan,
            wrap: None,
            row: 0,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn wrap(&self) -> Option<usize> {
        self.wrap
    }

    /// Position of the row just classified, if it belongs to a plan wrap.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.region {
            Region::Plan => self.wrap.map(|wrap| (wrap, self.row)),
            Region::Legend => None,
        }
    }

    /// Feeds the second cell of the next row and updates the state.
    pub fn advance(&mut self, second_cell: Option<&str>) -> Region {
        if self.region == Region::Plan && self.wrap.is_some() {
            self.row += 1;
        }
        if let Some(text) = second_cell.map(str::trim) {
            if self.region == Region::Plan && text == self.config.legend_sentinel {
                tracing::debug!("plan end");
                self.region = Region::Legend;
            } else if self.region == Region::Plan && CALENDAR_WEEK_RE.is_match(text) {
                self.row = 0;
                self.wrap = Some(self.wrap.map_or(0, |wrap| wrap + 1));
            }
        }
        self.region
    }

    pub fn scan(config: &ExtractorConfig, table: &Table) -> Scan {
        let mut classifier = RowClassifier::new(config);
        let mut scan = Scan::default();

        for cells in &table.rows {
            let region = classifier.advance(cells.get(1).map(|cell| cell.text.as_str()));
            if region == Region::Legend {
                scan.legend.push_row(cells);
                continue;
            }

            let Some((wrap, row)) = classifier.position() else {
                tracing::debug!("skipping row before the first calendar week");
                continue;
            };

            if let Some(header) = cells.first() {
                if let Some(caps) = CLASS_CELL_RE.captures(header.trimmed()) {
                    match (Cohort::from_year_digits(&config.cohort_prefix, &caps[2]), &header.color) {
                        (Some(cohort), Some(color)) => {
                            tracing::debug!(%cohort, class = header.trimmed(), wrap, "jahrgang color");
                            scan.jahrgang_keys.record(wrap, color.clone(), cohort);
                        }
                        _ => tracing::debug!(class = header.trimmed(), "class header without color"),
                    }
                }
            }

            scan.grid.push(
                row,
                Part {
                    wrap,
                    cells: cells.clone(),
                },
            );
        }

        tracing::info!(
            wraps = scan.grid.wrap_count(),
            rows = scan.grid.row_count(),
            legend_columns = scan.legend.column_count(),
            "finished first pass"
        );
        scan
    }
}
