//! Second pass: turns the classified grid into schedule events.

use crate::anchor::{AnchorError, AnchorTable, ColumnAnchor, event_start, time_of_day, weekday_offset};
use crate::class::Class;
use crate::classify::{ElementKind, RowClassifier, Scan, classify_element};
use crate::color_key::{Cohort, Resolved};
use crate::config::{AnchorPolicy, ConfigError, ExtractorConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::event::{EventMarker, ScheduleEvent};
use crate::grammar::{CellGrammar, ParsedCell, TokenGrammar};
use crate::grid::{Cell, Part, Table};
use crate::legend::{CellTypeColorKey, LecturerAbbrevMap};
use crate::plan::Plan;
use crate::registry::{GroupRegistry, GroupToken};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static BSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"B\.?Sc\.?").expect("valid bachelor of science regex"));

static BA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"B\.?A\.?").expect("valid bachelor of arts regex"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed week header at row {row}, wrap {wrap}, column {column}: {source}")]
    MalformedAnchor {
        row: usize,
        wrap: usize,
        column: usize,
        #[source]
        source: AnchorError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Plan plus the diagnostics reported while building it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub plan: Plan,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Extractor<G = TokenGrammar> {
    config: ExtractorConfig,
    grammar: G,
}

impl Default for Extractor<TokenGrammar> {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl Extractor<TokenGrammar> {
    pub fn new(config: ExtractorConfig) -> Self {
        Self::with_grammar(config, TokenGrammar)
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        Ok(Self::new(ExtractorConfig::from_json_file(path)?))
    }
}

impl<G: CellGrammar> Extractor<G> {
    pub fn with_grammar(config: ExtractorConfig, grammar: G) -> Self {
        Self { config, grammar }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&self, table: &Table, sink: &mut dyn DiagnosticSink) -> ExtractResult<Plan> {
        tracing::info!(rows = table.rows.len(), "step one");
        let scan = RowClassifier::scan(&self.config, table);

        tracing::info!("step two");
        let synthesis = Synthesis {
            config: &self.config,
            grammar: &self.grammar,
            cell_types: scan.legend.cell_types(&self.config.legend),
            lecturers: scan.legend.lecturers(&self.config.legend),
            anchors: AnchorTable::build(&scan.grid, &self.config.group_header_label),
            scan: &scan,
            registry: GroupRegistry::new(),
            plan: Plan::default(),
            skipped_columns: HashSet::new(),
            sink,
        };
        let plan = synthesis.run()?;
        tracing::info!(
            events = plan.len(),
            classes = plan.classes().len(),
            "finished step two"
        );
        Ok(plan)
    }

    pub fn extract_collecting(&self, table: &Table) -> ExtractResult<Extraction> {
        let mut diagnostics = Vec::new();
        let plan = self.extract(table, &mut diagnostics)?;
        Ok(Extraction { plan, diagnostics })
    }
}

enum ColumnWeek {
    Skip,
    Group,
    Week(NaiveDate),
}

/// What one group token of an entry stands for.
enum GroupTarget {
    /// Literal text, kept as the event note on the cohort placeholder.
    Note(String),
    /// Registered classes, in registration order.
    Classes(Vec<Class>),
}

/// Context shared by every element of one row part.
struct PartContext {
    row: usize,
    wrap: usize,
    cohort: Cohort,
    placeholder: Class,
    class: Option<Class>,
}

impl PartContext {
    fn current_class(&self) -> Class {
        self.class.clone().unwrap_or_else(|| self.placeholder.clone())
    }
}

struct Synthesis<'a, G> {
    config: &'a ExtractorConfig,
    grammar: &'a G,
    scan: &'a Scan,
    cell_types: CellTypeColorKey,
    lecturers: LecturerAbbrevMap,
    anchors: AnchorTable,
    registry: GroupRegistry,
    plan: Plan,
    skipped_columns: HashSet<(usize, usize)>,
    sink: &'a mut dyn DiagnosticSink,
}

impl<G: CellGrammar> Synthesis<'_, G> {
    fn run(mut self) -> ExtractResult<Plan> {
        let scan = self.scan;
        // Rows 0 and 1 are the calendar week and date range headers.
        for (row, parts) in scan.grid.rows().iter().enumerate().skip(2) {
            for part in parts {
                self.walk_part(row, part)?;
            }
        }
        Ok(self.plan)
    }

    fn walk_part(&mut self, row: usize, part: &Part) -> ExtractResult<()> {
        let header_color = part.header().and_then(|cell| cell.color.as_ref());
        let cohort = match self.scan.jahrgang_keys.resolve(part.wrap, header_color) {
            Resolved::Known(cohort) => cohort.clone(),
            Resolved::Unknown => {
                tracing::debug!(row, wrap = part.wrap, "no jahrgang for row color");
                return Ok(());
            }
        };

        let mut context = PartContext {
            row,
            wrap: part.wrap,
            placeholder: Class::with_year(cohort.year),
            cohort,
            class: None,
        };

        for (column, cell) in part.cells.iter().enumerate() {
            tracing::debug!(row, wrap = part.wrap, column, "element");
            let week = match self.column_week(&context, column)? {
                ColumnWeek::Skip => continue,
                ColumnWeek::Group => None,
                ColumnWeek::Week(monday) => Some(monday),
            };
            self.walk_element(&mut context, column, cell, week);
        }
        Ok(())
    }

    fn column_week(&mut self, context: &PartContext, column: usize) -> ExtractResult<ColumnWeek> {
        match self.anchors.get(context.wrap, column) {
            Some(ColumnAnchor::Week(monday)) => Ok(ColumnWeek::Week(*monday)),
            Some(ColumnAnchor::GroupColumn) | None => Ok(ColumnWeek::Group),
            Some(ColumnAnchor::Malformed(err)) => match self.config.anchor_policy {
                AnchorPolicy::Abort => Err(ExtractError::MalformedAnchor {
                    row: context.row,
                    wrap: context.wrap,
                    column,
                    source: err.clone(),
                }),
                AnchorPolicy::SkipColumn => {
                    if self.skipped_columns.insert((context.wrap, column)) {
                        let token = self
                            .scan
                            .grid
                            .cell(1, context.wrap, column)
                            .map(|cell| cell.trimmed().to_string())
                            .unwrap_or_default();
                        self.sink.report(
                            Diagnostic::new(DiagnosticKind::MalformedAnchor, context.row, context.wrap, column, token)
                                .with_detail(err.to_string()),
                        );
                    }
                    Ok(ColumnWeek::Skip)
                }
            },
        }
    }

    fn walk_element(&mut self, context: &mut PartContext, column: usize, cell: &Cell, week: Option<NaiveDate>) {
        if let (Some(monday), Resolved::Known(category)) =
            (week, self.cell_types.resolve(cell.color.as_ref()))
        {
            tracing::debug!(category = category.as_str(), "cell type");
            self.plan
                .add_full_week(category.clone(), context.current_class(), monday.and_time(NaiveTime::MIN));
        }

        for line in cell.lines() {
            match classify_element(context.row, line, &self.config.group_header_label) {
                ElementKind::ClassHeader => self.register_class(context, line),
                _ => match week {
                    Some(monday) => {
                        let parsed = self.grammar.parse(line);
                        tracing::debug!(text = line, ?parsed, "parsed");
                        self.synthesize(context, column, monday, &parsed, cell.comment_text());
                    }
                    None => tracing::debug!(text = line, "ignoring text in group column"),
                },
            }
        }
    }

    fn register_class(&mut self, context: &mut PartContext, text: &str) {
        let Some(class) = Class::from_full_name(text) else {
            return;
        };
        tracing::debug!(%class, cohort = %context.cohort, "class");
        self.plan.add_class(class.clone());
        self.registry.register(&context.cohort, &class);
        context.class = Some(class);
    }

    fn draft(&self, parsed: &ParsedCell, context: &PartContext, monday: NaiveDate) -> ScheduleEvent {
        let lecturer = parsed
            .lecturers
            .iter()
            .map(|abbrev| self.lecturers.full_name(abbrev))
            .collect::<Vec<_>>()
            .join("/");
        let room = parsed.rooms.join("/");

        let mut event = ScheduleEvent::new(
            parsed.subjects.join(" ").trim(),
            monday.and_time(NaiveTime::MIN),
            context.placeholder.clone(),
        );
        event.duration_hours = parsed.duration.unwrap_or(self.config.default_duration_hours);
        event.room = (!room.is_empty()).then_some(room);
        event.lecturer = lecturer;
        event
    }

    fn synthesize(&mut self, context: &PartContext, column: usize, monday: NaiveDate, parsed: &ParsedCell, comment: &str) {
        let mut draft = self.draft(parsed, context, monday);

        let days: Vec<&str> = if parsed.days.is_empty() {
            draft.marker = Some(EventMarker::FullWeek);
            vec!["Mo"]
        } else {
            parsed.days.iter().map(String::as_str).collect()
        };

        let targets = self.resolve_groups(context, column, &parsed.groups);

        for (index, day) in days.into_iter().enumerate() {
            let Some(offset) = weekday_offset(day) else {
                self.sink.report(Diagnostic::new(
                    DiagnosticKind::UnknownWeekday,
                    context.row,
                    context.wrap,
                    column,
                    day,
                ));
                continue;
            };
            let time = parsed
                .times
                .get(index)
                .or_else(|| parsed.times.first())
                .and_then(|time| time_of_day(time));
            draft.start = event_start(monday, offset, time);

            if parsed.groups.is_empty() {
                self.push_for_class(context, &draft, comment);
            } else {
                for target in &targets {
                    self.push_for_target(context, &draft, target);
                }
            }
        }
    }

    /// Row class (or cohort placeholder), plus one extra event per degree named in the comment.
    fn push_for_class(&mut self, context: &PartContext, draft: &ScheduleEvent, comment: &str) {
        let class = context.current_class();

        let mut event = draft.clone();
        event.class = class.clone();
        self.plan.push_event(event);

        for (marker, course) in [(&*BSC_RE, "BSc"), (&*BA_RE, "BA")] {
            if marker.is_match(comment) {
                tracing::debug!(course, "degree exam");
                let mut event = draft.clone();
                event.class = class.with_course(course);
                self.plan.push_event(event);
            }
        }
    }

    /// Resolves every group token of one entry once, reporting unknown groups.
    fn resolve_groups(&mut self, context: &PartContext, column: usize, tokens: &[String]) -> Vec<GroupTarget> {
        let mut targets = Vec::with_capacity(tokens.len());
        for token in tokens {
            let Some(group) = GroupToken::parse(token) else {
                tracing::debug!(token = token.as_str(), "not a group, appending to title");
                targets.push(GroupTarget::Note(token.clone()));
                continue;
            };

            match self.registry.expand(&context.cohort, &group) {
                Some(classes) => {
                    for class in &classes {
                        self.plan.add_class(class.clone());
                    }
                    targets.push(GroupTarget::Classes(classes));
                }
                None => self.sink.report(
                    Diagnostic::new(DiagnosticKind::UnresolvedGroup, context.row, context.wrap, column, token.as_str())
                        .with_detail(format!("group {:?} not known yet for {}", group.key, context.cohort)),
                ),
            }
        }
        targets
    }

    fn push_for_target(&mut self, context: &PartContext, draft: &ScheduleEvent, target: &GroupTarget) {
        match target {
            GroupTarget::Note(note) => {
                let mut event = draft.clone();
                event.note = Some(note.clone());
                event.class = context.placeholder.clone();
                self.plan.push_event(event);
            }
            GroupTarget::Classes(classes) => {
                for class in classes {
                    let mut event = draft.clone();
                    event.class = class.clone();
                    self.plan.push_event(event);
                }
            }
        }
    }
}
