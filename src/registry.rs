use crate::class::Class;
use crate::color_key::Cohort;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Group reference inside a cell, e.g. `d`, `2d` or `d1` (group `d`, part 1).
static GROUP_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<num>\d)?(?<key>\w)(?<part>\d)?$").expect("valid group token regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupToken {
    pub key: String,
    pub part: Option<String>,
}

impl GroupToken {
    /// Returns `None` for text that is not a group reference.
    pub fn parse(token: &str) -> Option<Self> {
        let caps = GROUP_TOKEN_RE.captures(token.trim())?;
        Some(Self {
            key: caps["key"].to_string(),
            part: caps.name("part").map(|part| part.as_str().to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLookup<'a> {
    /// Classes of the group in registration order.
    Resolved(&'a [Class]),
    /// Nothing registered for that letter so far. Classes are registered in
    /// traversal order, so references to later rows end up here as well.
    Unregistered,
}

/// Cohort → group letter → classes, built while the second pass walks the
/// grid top to bottom, left to right.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    cohorts: HashMap<Cohort, HashMap<String, Vec<Class>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class` under its group letter. Classes without a group and
    /// classes already in the group are ignored.
    pub fn register(&mut self, cohort: &Cohort, class: &Class) -> bool {
        let Some(group) = &class.group else {
            return false;
        };
        let classes = self
            .cohorts
            .entry(cohort.clone())
            .or_default()
            .entry(group.clone())
            .or_default();
        if classes.contains(class) {
            return false;
        }
        classes.push(class.clone());
        true
    }

    pub fn lookup(&self, cohort: &Cohort, key: &str) -> GroupLookup<'_> {
        match self.cohorts.get(cohort).and_then(|groups| groups.get(key)) {
            Some(classes) if !classes.is_empty() => GroupLookup::Resolved(classes.as_slice()),
            _ => GroupLookup::Unregistered,
        }
    }

    /// Concrete classes for `token`, with the part override applied.
    pub fn expand(&self, cohort: &Cohort, token: &GroupToken) -> Option<Vec<Class>> {
        match self.lookup(cohort, &token.key) {
            GroupLookup::Resolved(classes) => Some(
                classes
                    .iter()
                    .map(|class| match &token.part {
                        Some(part) => class.with_part(part.as_str()),
                        None => class.clone(),
                    })
                    .collect(),
            ),
            GroupLookup::Unregistered => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohort() -> Cohort {
        Cohort::from_year_digits("ABB", "15").unwrap()
    }

    #[test]
    fn group_token_shapes() {
        assert_eq!(
            GroupToken::parse("2d1"),
            Some(GroupToken {
                key: "d".into(),
                part: Some("1".into())
            })
        );
        assert_eq!(
            GroupToken::parse("e"),
            Some(GroupToken {
                key: "e".into(),
                part: None
            })
        );
        assert_eq!(GroupToken::parse("alle"), None);
    }

    #[test]
    fn lookup_before_registration_is_unregistered() {
        let mut registry = GroupRegistry::new();
        let cohort = cohort();
        assert_eq!(registry.lookup(&cohort, "d"), GroupLookup::Unregistered);

        let first = Class::from_full_name("FS151+BSc (FST) d").unwrap();
        let second = Class::from_full_name("FS152+BA (FSK) d").unwrap();
        assert!(registry.register(&cohort, &first));
        assert!(registry.register(&cohort, &second));
        assert!(!registry.register(&cohort, &first));

        let expanded = registry
            .expand(&cohort, &GroupToken::parse("d2").unwrap())
            .unwrap();
        assert_eq!(expanded.len(), 2);
        assert!(expanded.iter().all(|class| class.part.as_deref() == Some("2")));
    }
}
