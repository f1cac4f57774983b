use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Group letter not registered for the cohort at the time of reference.
    UnresolvedGroup,
    /// Day token that is none of Mo..So.
    UnknownWeekday,
    /// Column header could not be turned into a week; the column was skipped.
    MalformedAnchor,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedGroup => "unresolved_group",
            DiagnosticKind::UnknownWeekday => "unknown_weekday",
            DiagnosticKind::MalformedAnchor => "malformed_anchor",
        }
    }
}

/// Non-fatal problem found during extraction, located in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub row: usize,
    pub wrap: usize,
    pub column: usize,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, row: usize, wrap: usize, column: usize, token: impl Into<String>) -> Self {
        Self {
            kind,
            row,
            wrap,
            column,
            token: token.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} at row {}, wrap {}, column {}",
            self.kind.as_str(),
            self.token,
            self.row,
            self.wrap,
            self.column
        )?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

/// Receives diagnostics as extraction runs.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = diagnostic.kind.as_str(),
            row = diagnostic.row,
            wrap = diagnostic.wrap,
            column = diagnostic.column,
            token = %diagnostic.token,
            "{diagnostic}"
        );
    }
}

/// Keeps every diagnostic and also forwards it to another sink.
pub struct Tee<'a> {
    pub collected: Vec<Diagnostic>,
    inner: &'a mut dyn DiagnosticSink,
}

impl<'a> Tee<'a> {
    pub fn new(inner: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            collected: Vec::new(),
            inner,
        }
    }
}

impl DiagnosticSink for Tee<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.collected.push(diagnostic.clone());
        self.inner.report(diagnostic);
    }
}
