use crate::event::DEFAULT_DURATION_HOURS;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What to do when a column's calendar-week or date-range label is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Fail the whole extraction.
    Abort,
    /// Report one diagnostic and leave that column out.
    #[default]
    SkipColumn,
}

/// Fixed positions inside the column-oriented legend of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendLayout {
    pub swatch_column: usize,
    pub name_column: usize,
    pub category_first_row: usize,
    pub category_last_row: usize,
    pub lecturer_abbrev_column: usize,
    pub lecturer_name_column: usize,
    pub lecturer_header: String,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            swatch_column: 7,
            name_column: 8,
            category_first_row: 12,
            category_last_row: 14,
            lecturer_abbrev_column: 4,
            lecturer_name_column: 5,
            lecturer_header: "Dozentenkürzel".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Prepended to `20<yy>` to form a cohort code.
    pub cohort_prefix: String,
    pub default_duration_hours: f64,
    /// Second-cell text of the first legend row.
    pub legend_sentinel: String,
    /// Row-1 text of the column that holds class headers.
    pub group_header_label: String,
    pub anchor_policy: AnchorPolicy,
    pub legend: LegendLayout,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            cohort_prefix: "ABB".to_string(),
            default_duration_hours: DEFAULT_DURATION_HOURS,
            legend_sentinel: "Abkürzung".to_string(),
            group_header_label: "Gruppe".to_string(),
            anchor_policy: AnchorPolicy::default(),
            legend: LegendLayout::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cohort_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("cohort_prefix must not be empty".into()));
        }
        if !self.default_duration_hours.is_finite() || self.default_duration_hours <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_duration_hours must be positive (got {})",
                self.default_duration_hours
            )));
        }
        if self.legend.category_first_row > self.legend.category_last_row {
            return Err(ConfigError::Invalid(format!(
                "legend category rows {}..={} are reversed",
                self.legend.category_first_row, self.legend.category_last_row
            )));
        }
        Ok(())
    }
}
