//! Score analysis: derived views, rule dispatch and findings
//!
//! An `Analyzer` wraps one score and a tonal context, builds the
//! vertical slice list from the combined rhythm, and lazily derives
//! the cached views (harmonic and melodic intervals, voice-leading
//! quartets, windows, slice triplets) the rules evaluate over.
//! Findings accumulate in a keyed, insertion-ordered result store.
//!
//! The rule library in [`rules`] covers the standard counterpoint
//! checks; new rules are predicate/labeler pairs handed to the
//! generic evaluate operations in [`dispatch`].

pub mod dispatch;
pub mod error;
pub mod quartet;
pub mod results;
pub mod rules;
pub mod segment;
pub mod slices;
mod views;

use std::collections::HashMap;
use std::rc::Rc;

pub use dispatch::{EvalSpan, RuleOutcome};
pub use error::AnalysisError;
pub use quartet::{MotionKind, VoiceLeadingQuartet};
pub use results::{Entity, Finding, ResultStore, SymbolLocation, Value};
pub use segment::LinearWindow;
pub use slices::{VerticalSlice, VerticalSliceTriplet};

use crate::models::{Interval, Score, TonalContext};

/// Rule-evaluation engine over one score
///
/// Owns the score, the memoized view caches and the result store.
/// Views are pure functions of the immutable score; the only mutation
/// the analyzer ever performs on it is opt-in marker annotation.
pub struct Analyzer {
    score: Score,
    context: TonalContext,
    slices: Vec<VerticalSlice>,

    // Ordered "part1,part2" string keys, deliberately not canonicalized
    vlq_cache: HashMap<String, Rc<Vec<VoiceLeadingQuartet>>>,
    harmonic_cache: HashMap<(usize, usize), Rc<Vec<Option<Interval>>>>,
    melodic_cache: HashMap<usize, Rc<Vec<Option<Interval>>>>,
    window_cache: HashMap<(usize, usize), Rc<Vec<LinearWindow>>>,
    triplet_cache: Option<Rc<Vec<VerticalSliceTriplet>>>,

    store: ResultStore,
}

impl Analyzer {
    /// Wrap a score and tonal context and build the slice list
    pub fn new(score: Score, context: TonalContext) -> Self {
        let slices = slices::build_slices(&score);
        Self {
            score,
            context,
            slices,
            vlq_cache: HashMap::new(),
            harmonic_cache: HashMap::new(),
            melodic_cache: HashMap::new(),
            window_cache: HashMap::new(),
            triplet_cache: None,
            store: ResultStore::new(),
        }
    }

    /// The analyzed score (carries any annotation markers applied)
    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Give the score back, annotations included
    pub fn into_score(self) -> Score {
        self.score
    }

    /// The tonal context supplied at construction
    pub fn context(&self) -> &TonalContext {
        &self.context
    }

    /// Accumulated findings
    pub fn results(&self) -> &ResultStore {
        &self.store
    }

    /// Flattened text rendering of the findings, optionally filtered
    /// to a list of keys
    pub fn results_string(&self, filter: Option<&[&str]>) -> String {
        self.store.results_string(filter)
    }

    /// Apply a display marker to every finding's symbols, optionally
    /// filtered to a list of keys
    pub fn annotate_results(&mut self, marker: &str, filter: Option<&[&str]>) {
        let score = &mut self.score;
        for (key, bucket) in self.store.iter() {
            if let Some(wanted) = filter {
                if !wanted.contains(&key) {
                    continue;
                }
            }
            for finding in bucket {
                finding.annotate(score, marker);
            }
        }
    }
}
