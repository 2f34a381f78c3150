//! Theory analyzer: counterpoint rule evaluation over multi-part scores
//!
//! The crate is two layers. `models` holds the score fabric: spelled
//! pitches, intervals, timed symbols, parts and the tonal context.
//! `analysis` derives cached views of the score (simultaneities,
//! voice-leading quartets, melodic windows) and runs predicate rules
//! over them, collecting findings into a keyed result store.

pub mod analysis;
pub mod models;

// Re-export commonly used types
pub use analysis::{
    Analyzer, AnalysisError, EvalSpan, Finding, LinearWindow, MotionKind, ResultStore,
    RuleOutcome, Value, VerticalSlice, VerticalSliceTriplet, VoiceLeadingQuartet,
};
pub use models::{
    Accidental, Interval, IntervalQuality, Mode, Part, Pitch, Rational, Score, Step, Symbol,
    Timing, TonalContext, Tonic,
};
