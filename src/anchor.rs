//! Week anchors: the Monday of each plan column and offsets into that week.

use crate::classify::{ElementKind, classify_element};
use crate::grid::Grid;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static CALENDAR_WEEK_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})/KW ?(\d{1,2})").expect("valid calendar week label regex")
});

static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.?\s*-").expect("valid date range regex")
});

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid time regex"));

/// German weekday abbreviations, Monday first.
pub const WEEKDAYS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("calendar week label {0:?} does not look like YYYY/KW WW")]
    CalendarWeek(String),
    #[error("date range label {0:?} does not look like DD.MM-DD.MM")]
    DateRange(String),
    #[error("date {day:02}.{month:02}.{year} does not exist")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Resolved header of one plan column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnAnchor {
    /// The class-header column ("Gruppe"); it carries no date.
    GroupColumn,
    /// Monday of the column's week.
    Week(NaiveDate),
    Malformed(AnchorError),
}

/// Monday of the week labelled `calendar_week` (`2016/KW 9`) whose range is
/// `date_range` (`29.02-05.03`).
pub fn resolve_week(calendar_week: &str, date_range: &str) -> Result<NaiveDate, AnchorError> {
    let week = CALENDAR_WEEK_LABEL_RE
        .captures(calendar_week.trim())
        .ok_or_else(|| AnchorError::CalendarWeek(calendar_week.to_string()))?;
    let range = DATE_RANGE_RE
        .captures(date_range.trim())
        .ok_or_else(|| AnchorError::DateRange(date_range.to_string()))?;

    let mut year: i32 = week[1]
        .parse()
        .map_err(|_| AnchorError::CalendarWeek(calendar_week.to_string()))?;
    let week_number: u32 = week[2]
        .parse()
        .map_err(|_| AnchorError::CalendarWeek(calendar_week.to_string()))?;
    let day: u32 = range[1]
        .parse()
        .map_err(|_| AnchorError::DateRange(date_range.to_string()))?;
    let month: u32 = range[2]
        .parse()
        .map_err(|_| AnchorError::DateRange(date_range.to_string()))?;

    // Week 1 may start in the last days of December of the previous year.
    if week_number == 1 && month == 12 {
        year -= 1;
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or(AnchorError::InvalidDate { year, month, day })
}

/// Classifies and resolves the header of (`wrap`, `column`) from grid rows 0 and 1.
pub fn resolve_column(grid: &Grid, wrap: usize, column: usize, group_header_label: &str) -> ColumnAnchor {
    let calendar_week = grid.cell(0, wrap, column).map(|cell| cell.trimmed()).unwrap_or_default();
    let date_range = grid.cell(1, wrap, column).map(|cell| cell.trimmed()).unwrap_or_default();

    match classify_element(1, date_range, group_header_label) {
        ElementKind::GroupHeader => ColumnAnchor::GroupColumn,
        _ => match resolve_week(calendar_week, date_range) {
            Ok(monday) => ColumnAnchor::Week(monday),
            Err(err) => ColumnAnchor::Malformed(err),
        },
    }
}

/// Anchors for every column of every wrap, resolved once up front.
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    wraps: Vec<Vec<ColumnAnchor>>,
}

impl AnchorTable {
    pub fn build(grid: &Grid, group_header_label: &str) -> Self {
        let wraps = (0..grid.wrap_count())
            .map(|wrap| {
                let width = grid
                    .rows()
                    .iter()
                    .filter_map(|parts| parts.iter().find(|part| part.wrap == wrap))
                    .map(|part| part.cells.len())
                    .max()
                    .unwrap_or(0);
                (0..width)
                    .map(|column| resolve_column(grid, wrap, column, group_header_label))
                    .collect()
            })
            .collect();
        Self { wraps }
    }

    pub fn get(&self, wrap: usize, column: usize) -> Option<&ColumnAnchor> {
        self.wraps.get(wrap).and_then(|columns| columns.get(column))
    }
}

/// Offset of a German weekday abbreviation from Monday.
pub fn weekday_offset(day: &str) -> Option<i64> {
    WEEKDAYS
        .iter()
        .position(|candidate| *candidate == day.trim())
        .map(|offset| offset as i64)
}

/// Parses `HH:MM` anywhere in `time`.
pub fn time_of_day(time: &str) -> Option<NaiveTime> {
    let caps = TIME_RE.captures(time)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Start of an event: week Monday + weekday offset + time of day.
pub fn event_start(monday: NaiveDate, day_offset: i64, time: Option<NaiveTime>) -> NaiveDateTime {
    let date = monday + Duration::days(day_offset);
    date.and_time(time.unwrap_or(NaiveTime::MIN))
}
