use crate::Plan;
use polars::prelude::PolarsError;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("no plan stored")]
    NotFound,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait PlanStore {
    fn save_plan(&self, plan: &Plan) -> PersistenceResult<()>;
    fn load_plan(&self) -> PersistenceResult<Option<Plan>>;
}

/// Rejects plans that could not have come out of an extraction.
pub fn validate_plan(plan: &Plan) -> PersistenceResult<()> {
    for (index, event) in plan.events().iter().enumerate() {
        if !event.duration_hours.is_finite() || event.duration_hours <= 0.0 {
            return Err(PersistenceError::InvalidData(format!(
                "event {index} ({}) has invalid duration {}",
                event.display_title(),
                event.duration_hours
            )));
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod file;

pub use file::{load_plan_from_csv, load_plan_from_json, save_plan_to_csv, save_plan_to_json};
