//! Score and part containers
//!
//! A `Score` is an ordered list of `Part`s; a `Part` is an ordered run
//! of timed symbols. The lookup the analysis layer builds on is
//! `symbol_at`: the playable symbol at or immediately before a time
//! point, with rests and gaps collapsing to `Symbol::Absent`.

use serde::{Deserialize, Serialize};

use super::pitch::Pitch;
use super::symbol::{Rational, Symbol, Timing};

/// One voice: an ordered sequence of timed symbols
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    events: Vec<Symbol>,
}

impl Part {
    /// Create an empty part
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in onset order
    pub fn events(&self) -> &[Symbol] {
        &self.events
    }

    /// Offset at which the next appended event would start
    pub fn total_duration(&self) -> Rational {
        self.events
            .last()
            .and_then(|s| s.timing())
            .map(|t| t.end())
            .unwrap_or_else(|| Rational::from_integer(0))
    }

    /// Append a pre-timed symbol. Events must be pushed in onset order;
    /// `Absent` is a projection value, not an event, and is ignored.
    pub fn push(&mut self, symbol: Symbol) {
        if symbol.is_absent() {
            return;
        }
        debug_assert!(
            symbol.timing().map(|t| t.onset) >= self.events.last().and_then(|s| s.timing()).map(|t| t.onset),
            "events must be appended in onset order"
        );
        self.events.push(symbol);
    }

    /// Append a note after the last event
    pub fn append_note(&mut self, pitch: Pitch, duration: Rational, measure: u32) {
        let timing = Timing::new(self.total_duration(), duration, measure);
        self.events.push(Symbol::note(pitch, timing));
    }

    /// Append a chord after the last event
    pub fn append_chord(&mut self, pitches: Vec<Pitch>, duration: Rational, measure: u32) {
        let timing = Timing::new(self.total_duration(), duration, measure);
        self.events.push(Symbol::chord(pitches, timing));
    }

    /// Append a rest after the last event
    pub fn append_rest(&mut self, duration: Rational, measure: u32) {
        let timing = Timing::new(self.total_duration(), duration, measure);
        self.events.push(Symbol::rest(timing));
    }

    /// The symbol active at or immediately before `time`.
    ///
    /// Rests and uncovered times both yield `Absent`: for analysis a
    /// silent voice contributes nothing to a simultaneity. A note whose
    /// duration has expired still counts (at-or-before, not sounding),
    /// matching the combined-rhythm model where a long note is carried
    /// through later slices.
    pub fn symbol_at(&self, time: Rational) -> Symbol {
        let idx = self
            .events
            .partition_point(|s| s.timing().map(|t| t.onset <= time).unwrap_or(false));
        match idx.checked_sub(1).map(|i| &self.events[i]) {
            Some(symbol) if symbol.is_pitched() => symbol.clone(),
            _ => Symbol::Absent,
        }
    }

    /// Only the note and rest events, as `Symbol`s with rests mapped to
    /// `Absent`. This is the per-part symbol view: melodic analysis
    /// runs over a part's own rhythm, not the combined one.
    pub fn note_view(&self) -> Vec<Symbol> {
        self.events
            .iter()
            .filter(|s| matches!(s, Symbol::Note(_) | Symbol::Rest(_)))
            .map(|s| match s {
                Symbol::Note(_) => s.clone(),
                _ => Symbol::Absent,
            })
            .collect()
    }

    /// Mark the pitched event starting exactly at `onset`, if any
    fn set_marker_at(&mut self, onset: Rational, marker: &str) -> bool {
        let idx = self
            .events
            .partition_point(|s| s.timing().map(|t| t.onset < onset).unwrap_or(false));
        match self.events.get_mut(idx) {
            Some(symbol) if symbol.timing().map(|t| t.onset) == Some(onset) && symbol.is_pitched() => {
                symbol.set_marker(marker);
                true
            }
            _ => false,
        }
    }
}

/// An immutable multi-part score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    parts: Vec<Part>,
}

impl Score {
    /// Create an empty score
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part
    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// All parts in order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Number of parts
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// The combined rhythm: the sorted union of every part's onsets
    pub fn combined_onsets(&self) -> Vec<Rational> {
        let mut onsets: Vec<Rational> = self
            .parts
            .iter()
            .flat_map(|p| p.events().iter().filter_map(|s| s.timing().map(|t| t.onset)))
            .collect();
        onsets.sort();
        onsets.dedup();
        onsets
    }

    /// Symbol access across parts; `Absent` for silent or uncovered
    /// times. Part indices are not validated here, callers go through
    /// the analyzer which checks them.
    pub fn symbol_at(&self, part: usize, time: Rational) -> Symbol {
        self.parts
            .get(part)
            .map(|p| p.symbol_at(time))
            .unwrap_or(Symbol::Absent)
    }

    /// Apply a display marker to the pitched event of `part` starting
    /// at `onset`. Targets that resolve to nothing are logged and
    /// skipped rather than failing: annotation is a side channel.
    pub fn annotate_at(&mut self, part: usize, onset: Rational, marker: &str) {
        match self.parts.get_mut(part) {
            Some(p) => {
                if !p.set_marker_at(onset, marker) {
                    log::warn!(
                        "annotation target part {} onset {} has no pitched event",
                        part,
                        onset
                    );
                }
            }
            None => {
                log::warn!("annotation references part {} which doesn't exist", part);
            }
        }
    }
}
