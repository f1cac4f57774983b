use crate::class::Class;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Duration, in hours, of an event whose text does not state one.
pub const DEFAULT_DURATION_HOURS: f64 = 3.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMarker {
    /// No specific weekday; the event stands for its whole week.
    FullWeek,
}

impl EventMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventMarker::FullWeek => "full_week",
        }
    }

}

impl FromStr for EventMarker {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "full_week" => Ok(EventMarker::FullWeek),
            other => Err(format!("unknown event marker '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub title: String,
    pub duration_hours: f64,
    pub start: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub lecturer: String,
    pub class: Class,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<EventMarker>,
    /// Extra text rendered after the title in parentheses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ScheduleEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, class: Class) -> Self {
        Self {
            title: title.into(),
            duration_hours: DEFAULT_DURATION_HOURS,
            start,
            room: None,
            lecturer: String::new(),
            class,
            marker: None,
            note: None,
        }
    }

    pub fn is_full_week(&self) -> bool {
        self.marker == Some(EventMarker::FullWeek)
    }

    pub fn display_title(&self) -> String {
        match &self.note {
            Some(note) if self.title.is_empty() => format!("({note})"),
            Some(note) => format!("{} ({note})", self.title),
            None => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_parses_from_its_name() {
        assert_eq!("full_week".parse::<EventMarker>(), Ok(EventMarker::FullWeek));
        assert_eq!(EventMarker::FullWeek.as_str().parse::<EventMarker>(), Ok(EventMarker::FullWeek));
        assert!("weekly".parse::<EventMarker>().is_err());
    }
}
