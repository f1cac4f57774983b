use crate::grid::CellColor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Outcome of a color lookup. A miss is a regular value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<T> {
    Known(T),
    Unknown,
}

impl<T> Resolved<T> {
    pub fn known(self) -> Option<T> {
        match self {
            Resolved::Known(value) => Some(value),
            Resolved::Unknown => None,
        }
    }
}

/// Map from background color to whatever that color stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorKey<V> {
    entries: HashMap<CellColor, V>,
}

impl<V> Default for ColorKey<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> ColorKey<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys `color` unless it is already keyed. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, color: CellColor, value: V) -> bool {
        if self.entries.contains_key(&color) {
            return false;
        }
        self.entries.insert(color, value);
        true
    }

    pub fn insert(&mut self, color: CellColor, value: V) {
        self.entries.insert(color, value);
    }

    pub fn resolve(&self, color: Option<&CellColor>) -> Resolved<&V> {
        match color.and_then(|color| self.entries.get(color)) {
            Some(value) => Resolved::Known(value),
            None => Resolved::Unknown,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A jahrgang: all classes that started in the same year, e.g. `ABB2015`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cohort {
    pub code: String,
    pub year: i32,
}

impl Cohort {
    /// Builds the cohort code from the two year digits of a class header.
    pub fn from_year_digits(prefix: &str, digits: &str) -> Option<Self> {
        let short: i32 = digits.parse().ok()?;
        if digits.len() != 2 {
            return None;
        }
        Some(Self {
            code: format!("{prefix}20{digits}"),
            year: 2000 + short,
        })
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Per-wrap color → cohort assignment, filled from class-header cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JahrgangColorKeys {
    wraps: Vec<ColorKey<Cohort>>,
}

impl JahrgangColorKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, wrap: usize, color: CellColor, cohort: Cohort) -> bool {
        while self.wraps.len() <= wrap {
            self.wraps.push(ColorKey::new());
        }
        self.wraps[wrap].insert_if_absent(color, cohort)
    }

    pub fn resolve(&self, wrap: usize, color: Option<&CellColor>) -> Resolved<&Cohort> {
        match self.wraps.get(wrap) {
            Some(key) => key.resolve(color),
            None => Resolved::Unknown,
        }
    }

    pub fn wrap(&self, wrap: usize) -> Option<&ColorKey<Cohort>> {
        self.wraps.get(wrap)
    }

    pub fn wrap_count(&self) -> usize {
        self.wraps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cohort_code_prefixes_century() {
        let cohort = Cohort::from_year_digits("ABB", "15").unwrap();
        assert_eq!(cohort.code, "ABB2015");
        assert_eq!(cohort.year, 2015);
        assert!(Cohort::from_year_digits("ABB", "1a").is_none());
    }

    #[test]
    fn first_color_assignment_wins() {
        let mut keys = JahrgangColorKeys::new();
        let red = CellColor::new("#FF0000");
        let first = Cohort::from_year_digits("ABB", "15").unwrap();
        let second = Cohort::from_year_digits("ABB", "16").unwrap();

        assert!(keys.record(1, red.clone(), first.clone()));
        assert!(!keys.record(1, red.clone(), second));
        assert_eq!(keys.resolve(1, Some(&red)), Resolved::Known(&first));
        assert_eq!(keys.resolve(0, Some(&red)), Resolved::Unknown);
        assert_eq!(keys.resolve(1, None), Resolved::Unknown);
    }
}
