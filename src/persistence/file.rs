use super::{PersistenceError, PersistenceResult};
use crate::{Class, EventMarker, Plan, ScheduleEvent};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

const START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize, Deserialize)]
struct PlanSnapshot {
    name: String,
    events: Vec<ScheduleEvent>,
    classes: BTreeSet<Class>,
}

impl PlanSnapshot {
    fn from_plan(plan: &Plan) -> PersistenceResult<Self> {
        super::validate_plan(plan)?;
        Ok(Self {
            name: plan.name().to_string(),
            events: plan.events().to_vec(),
            classes: plan.classes().clone(),
        })
    }

    fn into_plan(self) -> PersistenceResult<Plan> {
        let plan = Plan::from_parts(self.name, self.events, self.classes);
        super::validate_plan(&plan)?;
        Ok(plan)
    }
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &Plan, path: P) -> PersistenceResult<()> {
    let snapshot = PlanSnapshot::from_plan(plan)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Plan> {
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    snapshot.into_plan()
}

#[derive(Serialize, Deserialize)]
struct EventCsvRecord {
    title: String,
    note: String,
    start: String,
    duration_hours: f64,
    room: String,
    lecturer: String,
    marker: String,
    class_year: i32,
    class_group: String,
    class_full_name: String,
    class_course: String,
    class_part: String,
    class_cert: String,
}

impl From<&ScheduleEvent> for EventCsvRecord {
    fn from(event: &ScheduleEvent) -> Self {
        Self {
            title: event.title.clone(),
            note: event.note.clone().unwrap_or_default(),
            start: event.start.format(START_FORMAT).to_string(),
            duration_hours: event.duration_hours,
            room: event.room.clone().unwrap_or_default(),
            lecturer: event.lecturer.clone(),
            marker: event.marker.map(|m| m.as_str().to_string()).unwrap_or_default(),
            class_year: event.class.year,
            class_group: event.class.group.clone().unwrap_or_default(),
            class_full_name: event.class.full_name.clone().unwrap_or_default(),
            class_course: event.class.course.clone().unwrap_or_default(),
            class_part: event.class.part.clone().unwrap_or_default(),
            class_cert: event.class.cert.clone().unwrap_or_default(),
        }
    }
}

impl EventCsvRecord {
    fn into_event(self) -> PersistenceResult<ScheduleEvent> {
        let start = NaiveDateTime::parse_from_str(self.start.trim(), START_FORMAT).map_err(|e| {
            PersistenceError::InvalidData(format!("invalid start '{}': {e}", self.start))
        })?;
        let marker = if self.marker.trim().is_empty() {
            None
        } else {
            Some(
                self.marker
                    .trim()
                    .parse::<EventMarker>()
                    .map_err(PersistenceError::InvalidData)?,
            )
        };

        let class = Class {
            year: self.class_year,
            group: parse_string_option(self.class_group),
            full_name: parse_string_option(self.class_full_name),
            course: parse_string_option(self.class_course),
            part: parse_string_option(self.class_part),
            cert: parse_string_option(self.class_cert),
        };

        let mut event = ScheduleEvent::new(self.title, start, class);
        event.duration_hours = self.duration_hours;
        event.room = parse_string_option(self.room);
        event.lecturer = self.lecturer;
        event.marker = marker;
        event.note = parse_string_option(self.note);
        Ok(event)
    }
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &Plan, path: P) -> PersistenceResult<()> {
    super::validate_plan(plan)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for event in plan.events() {
        writer.serialize(EventCsvRecord::from(event))?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV only carries events, so the class set is rebuilt from them.
pub fn load_plan_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Plan> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut events = Vec::new();
    for record in reader.deserialize::<EventCsvRecord>() {
        let record = record?;
        events.push(record.into_event()?);
    }

    if events.is_empty() {
        return Err(PersistenceError::InvalidData("CSV file contained no events".into()));
    }

    let classes: Vec<Class> = events.iter().map(|event| event.class.clone()).collect();
    let plan = Plan::from_parts("Semesterplan", events, classes);
    super::validate_plan(&plan)?;
    Ok(plan)
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
