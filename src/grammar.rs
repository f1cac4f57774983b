//! Free-text grammar of plan cells.
//!
//! A cell entry reads roughly `<days> <times> [rooms] subject words (groups) - lecturers`,
//! every part optional. Extraction only depends on the [`CellGrammar`] trait, so
//! another grammar can be plugged in without touching the synthesizer.

use crate::anchor::{WEEKDAYS, time_of_day};
use regex::Regex;
use std::sync::LazyLock;

static ROOMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid rooms regex"));

static GROUPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid groups regex"));

static LECTURERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)-\s*(?<lect>[^\s-][^-]*)$").expect("valid lecturers regex")
});

static TIME_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<from>\d{1,2}:\d{2})(?:-(?<to>\d{1,2}:\d{2}))?$").expect("valid time token regex")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?<hours>\d+(?:[.,]\d+)?)(?:h|std\.?)$").expect("valid duration regex")
});

static LIST_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/,]").expect("valid list separator regex"));

/// Tokens of one cell entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCell {
    /// Weekday abbreviations, possibly empty.
    pub days: Vec<String>,
    /// `HH:MM` start times, possibly empty.
    pub times: Vec<String>,
    pub rooms: Vec<String>,
    pub subjects: Vec<String>,
    pub groups: Vec<String>,
    /// Lecturer abbreviations.
    pub lecturers: Vec<String>,
    /// Hours, when the entry states a duration.
    pub duration: Option<f64>,
}

pub trait CellGrammar {
    fn parse(&self, text: &str) -> ParsedCell;
}

impl<F> CellGrammar for F
where
    F: Fn(&str) -> ParsedCell,
{
    fn parse(&self, text: &str) -> ParsedCell {
        self(text)
    }
}

/// Default whitespace/bracket based grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGrammar;

impl TokenGrammar {
    fn split_list(input: &str) -> impl Iterator<Item = String> + '_ {
        LIST_SEPARATOR_RE
            .split(input)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToOwned::to_owned)
    }

    fn day_token(token: &str) -> Option<Vec<String>> {
        let days: Vec<&str> = token.split(['/', ',', '+']).collect();
        if days.iter().all(|day| WEEKDAYS.contains(day)) {
            Some(days.into_iter().map(ToOwned::to_owned).collect())
        } else {
            None
        }
    }

    fn time_token(token: &str, parsed: &mut ParsedCell) -> bool {
        let entries: Vec<&str> = token.split('/').collect();
        if !entries.iter().all(|entry| TIME_TOKEN_RE.is_match(entry)) {
            return false;
        }
        for entry in entries {
            let Some(caps) = TIME_TOKEN_RE.captures(entry) else {
                continue;
            };
            let from = caps["from"].to_string();
            if let (Some(to), None) = (caps.name("to"), parsed.duration) {
                if let (Some(start), Some(end)) = (time_of_day(&from), time_of_day(to.as_str())) {
                    let minutes = (end - start).num_minutes();
                    if minutes > 0 {
                        parsed.duration = Some(minutes as f64 / 60.0);
                    }
                }
            }
            parsed.times.push(from);
        }
        true
    }

    fn duration_token(token: &str) -> Option<f64> {
        let caps = DURATION_RE.captures(token)?;
        caps["hours"].replace(',', ".").parse().ok()
    }
}

impl CellGrammar for TokenGrammar {
    fn parse(&self, text: &str) -> ParsedCell {
        let mut parsed = ParsedCell::default();

        for caps in ROOMS_RE.captures_iter(text) {
            parsed.rooms.extend(Self::split_list(&caps[1]));
        }
        let rest = ROOMS_RE.replace_all(text, " ");

        for caps in GROUPS_RE.captures_iter(&rest) {
            parsed.groups.extend(
                caps[1]
                    .split(|c: char| c == '/' || c == ',' || c.is_whitespace())
                    .filter(|group| !group.is_empty())
                    .map(ToOwned::to_owned),
            );
        }
        let rest = GROUPS_RE.replace_all(&rest, " ");

        let rest = match LECTURERS_RE.captures(rest.trim_end()) {
            Some(caps) => {
                parsed.lecturers.extend(Self::split_list(&caps["lect"]));
                let start = caps.get(0).map_or(0, |m| m.start());
                rest[..start].to_string()
            }
            None => rest.to_string(),
        };

        for token in rest.split_whitespace() {
            if let Some(days) = Self::day_token(token) {
                parsed.days.extend(days);
            } else if Self::time_token(token, &mut parsed) {
                continue;
            } else if let Some(hours) = Self::duration_token(token) {
                parsed.duration = Some(hours);
            } else {
                parsed.subjects.push(token.to_string());
            }
        }

        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_entry() {
        let parsed = TokenGrammar.parse("Mi 10:15 [A101/B2] Mathematik II (d1/e) - XY/ZZ");
        assert_eq!(parsed.days, vec!["Mi"]);
        assert_eq!(parsed.times, vec!["10:15"]);
        assert_eq!(parsed.rooms, vec!["A101", "B2"]);
        assert_eq!(parsed.subjects, vec!["Mathematik", "II"]);
        assert_eq!(parsed.groups, vec!["d1", "e"]);
        assert_eq!(parsed.lecturers, vec!["XY", "ZZ"]);
        assert_eq!(parsed.duration, None);
    }

    #[test]
    fn parses_multiple_days_and_duration() {
        let parsed = TokenGrammar.parse("Mo/Do 08:00/13:00 BWL 1,5h");
        assert_eq!(parsed.days, vec!["Mo", "Do"]);
        assert_eq!(parsed.times, vec!["08:00", "13:00"]);
        assert_eq!(parsed.subjects, vec!["BWL"]);
        assert_eq!(parsed.duration, Some(1.5));
    }

    #[test]
    fn time_range_implies_duration() {
        let parsed = TokenGrammar.parse("Fr 08:00-11:15 Recht");
        assert_eq!(parsed.times, vec!["08:00"]);
        assert_eq!(parsed.duration, Some(3.25));
    }

    #[test]
    fn hyphenated_subject_is_not_a_lecturer() {
        let parsed = TokenGrammar.parse("Projekt-Management");
        assert_eq!(parsed.subjects, vec!["Projekt-Management"]);
        assert!(parsed.lecturers.is_empty());
        assert!(parsed.days.is_empty());
    }
}
