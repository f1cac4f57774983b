use crate::class::Class;
use crate::event::{EventMarker, ScheduleEvent};
use chrono::NaiveDateTime;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use std::collections::BTreeSet;

/// Extraction result: events in traversal order plus every class seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    name: String,
    events: Vec<ScheduleEvent>,
    classes: BTreeSet<Class>,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new("Semesterplan")
    }
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
            classes: BTreeSet::new(),
        }
    }

    pub fn from_parts<E, C>(name: impl Into<String>, events: E, classes: C) -> Self
    where
        E: IntoIterator<Item = ScheduleEvent>,
        C: IntoIterator<Item = Class>,
    {
        Self {
            name: name.into(),
            events: events.into_iter().collect(),
            classes: classes.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn classes(&self) -> &BTreeSet<Class> {
        &self.classes
    }

    pub fn push_event(&mut self, event: ScheduleEvent) {
        self.events.push(event);
    }

    /// Returns `true` if the class was not known before.
    pub fn add_class(&mut self, class: Class) -> bool {
        self.classes.insert(class)
    }

    /// Appends a week-long event without a room, e.g. a practical placement week.
    pub fn add_full_week(&mut self, title: impl Into<String>, class: Class, week_start: NaiveDateTime) {
        let mut event = ScheduleEvent::new(title, week_start, class);
        event.marker = Some(EventMarker::FullWeek);
        self.events.push(event);
    }

    pub fn events_for<'a>(&'a self, class: &'a Class) -> impl Iterator<Item = &'a ScheduleEvent> + 'a {
        self.events.iter().filter(move |event| &event.class == class)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Tabular view of the events, one row per event.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(7);

        let titles: Vec<String> = self.events.iter().map(ScheduleEvent::display_title).collect();
        columns.push(Series::new(PlSmallStr::from_static("title"), titles).into_column());

        let starts: Vec<i64> = self
            .events
            .iter()
            .map(|event| event.start.and_utc().timestamp_millis())
            .collect();
        columns.push(
            Series::new(PlSmallStr::from_static("start"), starts)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .into_column(),
        );

        let durations: Vec<f64> = self.events.iter().map(|event| event.duration_hours).collect();
        columns.push(
            Series::new(PlSmallStr::from_static("duration_hours"), durations).into_column(),
        );

        let rooms: Vec<Option<&str>> = self.events.iter().map(|event| event.room.as_deref()).collect();
        columns.push(Series::new(PlSmallStr::from_static("room"), rooms).into_column());

        let lecturers: Vec<&str> = self.events.iter().map(|event| event.lecturer.as_str()).collect();
        columns.push(Series::new(PlSmallStr::from_static("lecturer"), lecturers).into_column());

        let classes: Vec<String> = self.events.iter().map(|event| event.class.to_string()).collect();
        columns.push(Series::new(PlSmallStr::from_static("class"), classes).into_column());

        let full_week: Vec<bool> = self.events.iter().map(ScheduleEvent::is_full_week).collect();
        columns.push(Series::new(PlSmallStr::from_static("full_week"), full_week).into_column());

        DataFrame::new(columns)
    }
}
