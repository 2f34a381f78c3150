//! Findings and the keyed result store
//!
//! A finding keeps a clone of the entity that triggered it, the
//! predicate's payload, a readable description, and the score
//! locations of the symbols involved. Locations rather than shared
//! references keep analysis results decoupled from the score; applying
//! a display marker is an explicit, separate step.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::quartet::VoiceLeadingQuartet;
use super::segment::LinearWindow;
use super::slices::{VerticalSlice, VerticalSliceTriplet};
use crate::models::{Interval, Rational, Score, Symbol};

/// Payload attached to a finding by its predicate
///
/// Zero and empty-string payloads are real matches; "no finding" is
/// expressed by the dispatch layer's outcome type, never by a falsy
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Address of one symbol in the score: part index plus event onset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolLocation {
    pub part: usize,
    pub onset: Rational,
}

impl SymbolLocation {
    /// Location of a pitched symbol in `part`, `None` otherwise
    pub fn of(part: usize, symbol: &Symbol) -> Option<Self> {
        if symbol.is_pitched() {
            symbol.timing().map(|t| Self {
                part,
                onset: t.onset,
            })
        } else {
            None
        }
    }
}

/// The originating entity of a finding, by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Quartet(VoiceLeadingQuartet),
    HarmonicInterval(Option<Interval>),
    MelodicInterval(Option<Interval>),
    Symbol(Symbol),
    Slice(VerticalSlice),
    Triplet {
        triplet: VerticalSliceTriplet,
        part: usize,
    },
    Window(LinearWindow),
}

/// One predicate match: entity, payload, description, locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub entity: Entity,
    pub value: Value,
    pub text: String,

    /// Score locations of the symbols this finding points at
    pub locations: Vec<SymbolLocation>,
}

impl Finding {
    /// Apply a display marker to every symbol this finding references.
    /// The only mutation the analysis layer ever performs, and only on
    /// request.
    pub fn annotate(&self, score: &mut Score, marker: &str) {
        for location in &self.locations {
            score.annotate_at(location.part, location.onset, marker);
        }
    }
}

/// Ordered, keyed accumulation of findings
///
/// Keys appear in first-use order and each key's findings in discovery
/// order; both orders are part of the output contract, which is why
/// this is a vector of buckets rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultStore {
    entries: Vec<(String, Vec<Finding>)>,
}

impl ResultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `key` exists, with an empty bucket if new
    pub fn ensure(&mut self, key: &str) {
        if !self.entries.iter().any(|(k, _)| k == key) {
            self.entries.push((key.to_string(), Vec::new()));
        }
    }

    /// Append a finding under `key`
    pub fn push(&mut self, key: &str, finding: Finding) {
        self.ensure(key);
        if let Some((_, bucket)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            bucket.push(finding);
        }
    }

    /// Findings under `key`, if the key exists
    pub fn get(&self, key: &str) -> Option<&[Finding]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, bucket)| bucket.as_slice())
    }

    /// Keys in first-use order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// All buckets in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Finding])> {
        self.entries
            .iter()
            .map(|(k, bucket)| (k.as_str(), bucket.as_slice()))
    }

    /// Total number of findings across all keys
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    /// Whether no findings have been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened text rendering: each key line followed by its
    /// findings' texts, one per line. `filter` restricts to the listed
    /// keys without changing their stored order.
    pub fn results_string(&self, filter: Option<&[&str]>) -> String {
        let mut out = String::new();
        for (key, bucket) in &self.entries {
            if let Some(wanted) = filter {
                if !wanted.contains(&key.as_str()) {
                    continue;
                }
            }
            out.push_str(key);
            out.push_str(": \n");
            for finding in bucket {
                out.push_str(&finding.text);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(text: &str) -> Finding {
        Finding {
            entity: Entity::Symbol(Symbol::Absent),
            value: Value::Bool(true),
            text: text.to_string(),
            locations: Vec::new(),
        }
    }

    #[test]
    fn test_keys_keep_first_use_order() {
        let mut store = ResultStore::new();
        store.ensure("later");
        store.push("earlier", finding("a"));
        store.push("later", finding("b"));
        store.push("earlier", finding("c"));

        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["later", "earlier"]);
        assert_eq!(store.get("earlier").unwrap().len(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_results_string_format() {
        let mut store = ResultStore::new();
        store.push("parallelFifths", finding("first"));
        store.push("parallelFifths", finding("second"));
        store.push("other", finding("third"));

        assert_eq!(
            store.results_string(None),
            "parallelFifths: \nfirst\nsecond\nother: \nthird\n"
        );
        assert_eq!(
            store.results_string(Some(&["other"])),
            "other: \nthird\n"
        );
    }

    #[test]
    fn test_zero_and_empty_values_are_real() {
        let mut store = ResultStore::new();
        let mut zero = finding("zero");
        zero.value = Value::Int(0);
        let mut empty = finding("empty");
        empty.value = Value::Text(String::new());
        store.push("values", zero);
        store.push("values", empty);

        let bucket = store.get("values").unwrap();
        assert_eq!(bucket[0].value, Value::Int(0));
        assert_eq!(bucket[1].value, Value::Text(String::new()));
    }
}
