pub mod anchor;
pub mod class;
pub mod classify;
pub mod color_key;
pub mod config;
pub mod diagnostics;
pub mod event;
pub mod extract;
pub mod grammar;
pub mod grid;
pub mod html;
pub mod legend;
pub mod persistence;
pub mod plan;
pub mod registry;

pub use anchor::{AnchorError, ColumnAnchor};
pub use class::Class;
pub use classify::{ElementKind, Region, RowClassifier};
pub use color_key::{Cohort, ColorKey, JahrgangColorKeys, Resolved};
pub use config::{AnchorPolicy, ConfigError, ExtractorConfig, LegendLayout};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use event::{DEFAULT_DURATION_HOURS, EventMarker, ScheduleEvent};
pub use extract::{ExtractError, Extraction, Extractor};
pub use grammar::{CellGrammar, ParsedCell, TokenGrammar};
pub use grid::{Cell, CellColor, Grid, Part, Table};
pub use html::{load_table_from_html, load_table_from_html_file};
pub use legend::{CellTypeColorKey, LecturerAbbrevMap, Legend};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqlitePlanStore;
pub use persistence::{
    PersistenceError, PlanStore, load_plan_from_csv, load_plan_from_json, save_plan_to_csv,
    save_plan_to_json, validate_plan,
};
pub use plan::Plan;
pub use registry::{GroupLookup, GroupRegistry, GroupToken};
