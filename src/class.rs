use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A class header cell, e.g. `FS151+BSc (FST) d`: two letters, two year
/// digits, a running number, `+course`, `(certificate)` and the group letter.
pub(crate) static CLASS_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w{2}(\d{2})\d)\+(\w+) \((\w+)\) (\w)$").expect("valid class cell regex")
});

/// A concrete teaching group. Two classes with equal fields are the same class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Class {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
}

impl Class {
    /// Cohort placeholder carrying only the year.
    pub fn with_year(year: i32) -> Self {
        Self {
            year,
            group: None,
            full_name: None,
            course: None,
            part: None,
            cert: None,
        }
    }

    /// Parses a class header token. Returns `None` if `text` is not one.
    pub fn from_full_name(text: &str) -> Option<Self> {
        let caps = CLASS_CELL_RE.captures(text.trim())?;
        let short: i32 = caps[2].parse().ok()?;
        Some(Self {
            year: 2000 + short,
            group: Some(caps[5].to_string()),
            full_name: Some(caps[1].to_string()),
            course: Some(caps[3].to_string()),
            part: None,
            cert: Some(caps[4].to_string()),
        })
    }

    pub fn is_class_cell(text: &str) -> bool {
        CLASS_CELL_RE.is_match(text.trim())
    }

    pub fn with_course(&self, course: impl Into<String>) -> Self {
        Self {
            course: Some(course.into()),
            ..self.clone()
        }
    }

    pub fn with_part(&self, part: impl Into<String>) -> Self {
        Self {
            part: Some(part.into()),
            ..self.clone()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.full_name.is_none() && self.group.is_none()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year)?;
        for field in [&self.full_name, &self.course, &self.cert, &self.group]
            .into_iter()
            .flatten()
        {
            write!(f, "-{field}")?;
        }
        if let Some(part) = &self.part {
            write!(f, "/{part}")?;
        }
        Ok(())
    }
}
