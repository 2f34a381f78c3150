//! Generic rule dispatch
//!
//! One evaluate operation per entity kind, all with the same shape:
//! resolve the selector (explicit target, or canonical enumeration
//! when omitted), pull the derived view, apply the predicate to each
//! element, and append a finding per match. Predicate outcomes are an
//! explicit two-case type: `NoMatch` is the only way to say "no
//! finding", so zero or empty payloads are still matches.
//!
//! Annotation is opt-in: passing a marker makes the engine mark every
//! matched symbol in the analyzer's score, otherwise evaluation never
//! mutates anything but the store.

use super::error::AnalysisError;
use super::quartet::VoiceLeadingQuartet;
use super::results::{Entity, Finding, SymbolLocation, Value};
use super::segment::LinearWindow;
use super::slices::{VerticalSlice, VerticalSliceTriplet};
use super::Analyzer;
use crate::models::{Interval, Symbol};

/// A predicate's verdict on one view element
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// No finding for this element
    NoMatch,

    /// A finding, carrying the rule's payload
    Match(Value),
}

impl RuleOutcome {
    /// Boolean predicate helper: `true` matches with a `true` payload
    pub fn from_bool(hit: bool) -> Self {
        if hit {
            RuleOutcome::Match(Value::Bool(true))
        } else {
            RuleOutcome::NoMatch
        }
    }

    /// A match carrying `value` (zero/empty payloads included)
    pub fn matched(value: impl Into<Value>) -> Self {
        RuleOutcome::Match(value.into())
    }
}

/// Index bounds for quartet evaluation
///
/// `start` counts from the end when negative, as in "only the final
/// transition". The default spans the whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalSpan {
    pub start: i32,
    pub end: Option<usize>,
}

impl EvalSpan {
    /// The whole sequence
    pub fn all() -> Self {
        Self::default()
    }

    /// Only the first element (opening-motion rules)
    pub fn first() -> Self {
        Self {
            start: 0,
            end: Some(1),
        }
    }

    /// Only the last element (closing-motion rules)
    pub fn last() -> Self {
        Self { start: -1, end: None }
    }

    fn resolve(&self, len: usize) -> (usize, usize) {
        let start = if self.start >= 0 {
            (self.start as usize).min(len)
        } else {
            len.saturating_sub(self.start.unsigned_abs() as usize)
        };
        let end = self.end.unwrap_or(len).min(len);
        (start, end.max(start))
    }
}

fn quartet_locations(vlq: &VoiceLeadingQuartet) -> Vec<SymbolLocation> {
    [
        (vlq.part1, &vlq.v1n1),
        (vlq.part1, &vlq.v1n2),
        (vlq.part2, &vlq.v2n1),
        (vlq.part2, &vlq.v2n2),
    ]
    .into_iter()
    .filter_map(|(part, symbol)| SymbolLocation::of(part, symbol))
    .collect()
}

fn interval_locations(interval: Option<&Interval>, from_part: usize, to_part: usize) -> Vec<SymbolLocation> {
    match interval {
        Some(iv) => vec![
            SymbolLocation {
                part: from_part,
                onset: iv.start.timing.onset,
            },
            SymbolLocation {
                part: to_part,
                onset: iv.end.timing.onset,
            },
        ],
        None => Vec::new(),
    }
}

impl Analyzer {
    fn commit(&mut self, key: &str, marker: Option<&str>, findings: Vec<Finding>) {
        if let Some(marker) = marker {
            for finding in &findings {
                finding.annotate(&mut self.score, marker);
            }
        }
        for finding in findings {
            self.store.push(key, finding);
        }
    }

    /// Evaluate a predicate over the voice-leading quartets of one
    /// pair, or of every pair when `pair` is `None`
    pub fn evaluate_quartets<P, L>(
        &mut self,
        pair: Option<(usize, usize)>,
        key: &str,
        span: EvalSpan,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&VoiceLeadingQuartet) -> RuleOutcome,
        L: Fn(&VoiceLeadingQuartet, usize, usize) -> String,
    {
        self.store.ensure(key);
        match pair {
            None => {
                for (part1, part2) in self.all_part_pairs() {
                    self.quartets_concrete(part1, part2, key, span, marker, &predicate, &labeler)?;
                }
                Ok(())
            }
            Some((part1, part2)) => {
                self.quartets_concrete(part1, part2, key, span, marker, &predicate, &labeler)
            }
        }
    }

    fn quartets_concrete<P, L>(
        &mut self,
        part1: usize,
        part2: usize,
        key: &str,
        span: EvalSpan,
        marker: Option<&str>,
        predicate: &P,
        labeler: &L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&VoiceLeadingQuartet) -> RuleOutcome,
        L: Fn(&VoiceLeadingQuartet, usize, usize) -> String,
    {
        let quartets = self.transition_quartets(part1, part2)?;
        let (start, end) = span.resolve(quartets.len());

        let mut findings = Vec::new();
        for vlq in &quartets[start..end] {
            if let RuleOutcome::Match(value) = predicate(vlq) {
                findings.push(Finding {
                    entity: Entity::Quartet(vlq.clone()),
                    value,
                    text: labeler(vlq, part1, part2),
                    locations: quartet_locations(vlq),
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }

    /// Evaluate a predicate over the harmonic intervals of one pair,
    /// or of every pair when `pair` is `None`. Elements are `None`
    /// where a voice is absent; predicates see that explicitly.
    pub fn evaluate_harmonic_intervals<P, L>(
        &mut self,
        pair: Option<(usize, usize)>,
        key: &str,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(Option<&Interval>) -> RuleOutcome,
        L: Fn(Option<&Interval>, usize, usize) -> String,
    {
        self.store.ensure(key);
        match pair {
            None => {
                for (part1, part2) in self.all_part_pairs() {
                    self.harmonic_concrete(part1, part2, key, marker, &predicate, &labeler)?;
                }
                Ok(())
            }
            Some((part1, part2)) => {
                self.harmonic_concrete(part1, part2, key, marker, &predicate, &labeler)
            }
        }
    }

    fn harmonic_concrete<P, L>(
        &mut self,
        part1: usize,
        part2: usize,
        key: &str,
        marker: Option<&str>,
        predicate: &P,
        labeler: &L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(Option<&Interval>) -> RuleOutcome,
        L: Fn(Option<&Interval>, usize, usize) -> String,
    {
        let intervals = self.harmonic_intervals(part1, part2)?;

        let mut findings = Vec::new();
        for interval in intervals.iter() {
            if let RuleOutcome::Match(value) = predicate(interval.as_ref()) {
                findings.push(Finding {
                    entity: Entity::HarmonicInterval(interval.clone()),
                    value,
                    text: labeler(interval.as_ref(), part1, part2),
                    // The interval runs lower voice (part2) to upper
                    locations: interval_locations(interval.as_ref(), part2, part1),
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }

    /// Evaluate a predicate over the melodic intervals of one part, or
    /// of every part when `part` is `None`
    pub fn evaluate_melodic_intervals<P, L>(
        &mut self,
        part: Option<usize>,
        key: &str,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(Option<&Interval>) -> RuleOutcome,
        L: Fn(Option<&Interval>, usize) -> String,
    {
        self.store.ensure(key);
        match part {
            None => {
                for part in 0..self.score.num_parts() {
                    self.melodic_concrete(part, key, marker, &predicate, &labeler)?;
                }
                Ok(())
            }
            Some(part) => self.melodic_concrete(part, key, marker, &predicate, &labeler),
        }
    }

    fn melodic_concrete<P, L>(
        &mut self,
        part: usize,
        key: &str,
        marker: Option<&str>,
        predicate: &P,
        labeler: &L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(Option<&Interval>) -> RuleOutcome,
        L: Fn(Option<&Interval>, usize) -> String,
    {
        let intervals = self.melodic_intervals(part)?;

        let mut findings = Vec::new();
        for interval in intervals.iter() {
            if let RuleOutcome::Match(value) = predicate(interval.as_ref()) {
                findings.push(Finding {
                    entity: Entity::MelodicInterval(interval.clone()),
                    value,
                    text: labeler(interval.as_ref(), part),
                    locations: interval_locations(interval.as_ref(), part, part),
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }

    /// Evaluate a predicate over one part's note sequence (rests show
    /// up as `Absent`), or over every part when `part` is `None`
    pub fn evaluate_symbols<P, L>(
        &mut self,
        part: Option<usize>,
        key: &str,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&Symbol) -> RuleOutcome,
        L: Fn(&Symbol, usize) -> String,
    {
        self.store.ensure(key);
        match part {
            None => {
                for part in 0..self.score.num_parts() {
                    self.symbols_concrete(part, key, marker, &predicate, &labeler)?;
                }
                Ok(())
            }
            Some(part) => self.symbols_concrete(part, key, marker, &predicate, &labeler),
        }
    }

    fn symbols_concrete<P, L>(
        &mut self,
        part: usize,
        key: &str,
        marker: Option<&str>,
        predicate: &P,
        labeler: &L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&Symbol) -> RuleOutcome,
        L: Fn(&Symbol, usize) -> String,
    {
        self.check_part(part)?;
        let symbols = self.score.parts()[part].note_view();

        let mut findings = Vec::new();
        for symbol in &symbols {
            if let RuleOutcome::Match(value) = predicate(symbol) {
                findings.push(Finding {
                    entity: Entity::Symbol(symbol.clone()),
                    value,
                    text: labeler(symbol, part),
                    locations: SymbolLocation::of(part, symbol).into_iter().collect(),
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }

    /// Evaluate a predicate over every vertical slice
    pub fn evaluate_slices<P, L>(
        &mut self,
        key: &str,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&VerticalSlice) -> RuleOutcome,
        L: Fn(&VerticalSlice) -> String,
    {
        self.store.ensure(key);

        let mut findings = Vec::new();
        for slice in &self.slices {
            if let RuleOutcome::Match(value) = predicate(slice) {
                let locations = slice
                    .symbols()
                    .iter()
                    .enumerate()
                    .filter_map(|(part, symbol)| SymbolLocation::of(part, symbol))
                    .collect();
                findings.push(Finding {
                    entity: Entity::Slice(slice.clone()),
                    value,
                    text: labeler(slice),
                    locations,
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }

    /// Evaluate a predicate over the slice triplets, inspecting one
    /// part per call; `None` fans out over every part
    pub fn evaluate_triplets<P, L>(
        &mut self,
        part: Option<usize>,
        key: &str,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&VerticalSliceTriplet, usize) -> RuleOutcome,
        L: Fn(&VerticalSliceTriplet, usize) -> String,
    {
        self.store.ensure(key);
        match part {
            None => {
                for part in 0..self.score.num_parts() {
                    self.triplets_concrete(part, key, marker, &predicate, &labeler)?;
                }
                Ok(())
            }
            Some(part) => self.triplets_concrete(part, key, marker, &predicate, &labeler),
        }
    }

    fn triplets_concrete<P, L>(
        &mut self,
        part: usize,
        key: &str,
        marker: Option<&str>,
        predicate: &P,
        labeler: &L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&VerticalSliceTriplet, usize) -> RuleOutcome,
        L: Fn(&VerticalSliceTriplet, usize) -> String,
    {
        self.check_part(part)?;
        let triplets = self.slice_triplets();

        let mut findings = Vec::new();
        for triplet in triplets.iter() {
            if let RuleOutcome::Match(value) = predicate(triplet, part) {
                // The ornament candidate is the middle symbol
                let locations = SymbolLocation::of(part, triplet.second().symbol(part))
                    .into_iter()
                    .collect();
                findings.push(Finding {
                    entity: Entity::Triplet {
                        triplet: triplet.clone(),
                        part,
                    },
                    value,
                    text: labeler(triplet, part),
                    locations,
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }

    /// Evaluate a predicate over one part's three-symbol windows, or
    /// over every part when `part` is `None`
    pub fn evaluate_windows<P, L>(
        &mut self,
        part: Option<usize>,
        key: &str,
        marker: Option<&str>,
        predicate: P,
        labeler: L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&LinearWindow) -> RuleOutcome,
        L: Fn(&LinearWindow, usize) -> String,
    {
        self.store.ensure(key);
        match part {
            None => {
                for part in 0..self.score.num_parts() {
                    self.windows_concrete(part, key, marker, &predicate, &labeler)?;
                }
                Ok(())
            }
            Some(part) => self.windows_concrete(part, key, marker, &predicate, &labeler),
        }
    }

    fn windows_concrete<P, L>(
        &mut self,
        part: usize,
        key: &str,
        marker: Option<&str>,
        predicate: &P,
        labeler: &L,
    ) -> Result<(), AnalysisError>
    where
        P: Fn(&LinearWindow) -> RuleOutcome,
        L: Fn(&LinearWindow, usize) -> String,
    {
        let windows = self.three_symbol_windows(part)?;

        let mut findings = Vec::new();
        for window in windows.iter() {
            if let RuleOutcome::Match(value) = predicate(window) {
                let locations = SymbolLocation::of(part, window.middle())
                    .into_iter()
                    .collect();
                findings.push(Finding {
                    entity: Entity::Window(window.clone()),
                    value,
                    text: labeler(window, part),
                    locations,
                });
            }
        }
        self.commit(key, marker, findings);
        Ok(())
    }
}
