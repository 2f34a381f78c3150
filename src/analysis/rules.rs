//! The rule library
//!
//! Thin wrappers over the dispatch engine: each rule is a predicate
//! plus a labeler wired to one evaluate operation. Rules take an
//! optional target (a part or a pair; `None` means every valid
//! target), an optional display marker, and the store key to file
//! findings under, so several rules can share a composite key.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::dispatch::{EvalSpan, RuleOutcome};
use super::error::AnalysisError;
use super::quartet::{MotionKind, VoiceLeadingQuartet};
use super::Analyzer;

/// Canonical store keys used by the rules when callers have no reason
/// to pick their own
pub mod keys {
    pub const PARALLEL_FIFTHS: &str = "parallelFifths";
    pub const PARALLEL_OCTAVES: &str = "parallelOctaves";
    pub const PARALLEL_UNISONS: &str = "parallelUnisons";
    pub const HIDDEN_FIFTHS: &str = "hiddenFifths";
    pub const HIDDEN_OCTAVES: &str = "hiddenOctaves";
    pub const IMPROPER_RESOLUTIONS: &str = "improperResolution";
    pub const LEAP_NOT_SET_WITH_STEP: &str = "leapNotSetWithStep";
    pub const OPENS_INCORRECTLY: &str = "opensIncorrectly";
    pub const CLOSES_INCORRECTLY: &str = "closesIncorrectly";
    pub const OBLIQUE_MOTION: &str = "obliqueMotion";
    pub const SIMILAR_MOTION: &str = "similarMotion";
    pub const PARALLEL_MOTION: &str = "parallelMotion";
    pub const CONTRARY_MOTION: &str = "contraryMotion";
    pub const OUTWARD_CONTRARY_MOTION: &str = "outwardContraryMotion";
    pub const INWARD_CONTRARY_MOTION: &str = "inwardContraryMotion";
    pub const ANTIPARALLEL_MOTION: &str = "antiParallelMotion";
    pub const MOTION_TYPE: &str = "motionType";
    pub const DISSONANT_HARMONIC_INTERVALS: &str = "dissonantHarmonicIntervals";
    pub const DISSONANT_MELODIC_INTERVALS: &str = "dissonantMelodicIntervals";
    pub const HARMONIC_INTERVALS: &str = "harmonicIntervals";
    pub const SCALE_DEGREES: &str = "scaleDegrees";
    pub const POSSIBLE_PASSING_TONES: &str = "possiblePassingTone";
    pub const UNACCENTED_PASSING_TONES: &str = "unaccentedPassingTone";
    pub const UNACCENTED_NEIGHBOR_TONES: &str = "unaccentedNeighborTone";
    pub const COMMON_PRACTICE_ERRORS: &str = "commonPracticeErrors";
}

/// Simple names of the melodic intervals treated as dissonant
static DISSONANT_MELODIC: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["A2", "A4", "d5", "m7", "M7"].into_iter().collect());

/// "Part 1 moves from D to E while part 2 moves from G to A"
fn motion_clause(vlq: &VoiceLeadingQuartet, part1: usize, part2: usize) -> String {
    format!(
        "Part {} moves from {} to {} while part {} moves from {} to {}",
        part1 + 1,
        vlq.v1n1.name(),
        vlq.v1n2.name(),
        part2 + 1,
        vlq.v2n1.name(),
        vlq.v2n2.name()
    )
}

impl Analyzer {
    fn identify_quartet_rule<F>(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
        span: EvalSpan,
        test: F,
        label: &'static str,
    ) -> Result<(), AnalysisError>
    where
        F: Fn(&VoiceLeadingQuartet) -> bool,
    {
        self.evaluate_quartets(
            pair,
            key,
            span,
            marker,
            move |vlq| RuleOutcome::from_bool(test(vlq)),
            move |vlq, p1, p2| {
                format!(
                    "{} at measure {}: {}",
                    label,
                    vlq.v1n1.measure(),
                    motion_clause(vlq, p1, p2)
                )
            },
        )
    }

    /// Parallel perfect fifths between two parts, or every pair
    pub fn identify_parallel_fifths(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::parallel_fifth,
            "Parallel fifth",
        )
    }

    /// Parallel octaves between two parts, or every pair
    pub fn identify_parallel_octaves(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::parallel_octave,
            "Parallel octave",
        )
    }

    /// Parallel unisons between two parts, or every pair
    pub fn identify_parallel_unisons(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::parallel_unison,
            "Parallel unison",
        )
    }

    /// Hidden fifths (similar motion into a perfect fifth)
    pub fn identify_hidden_fifths(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::hidden_fifth,
            "Hidden fifth",
        )
    }

    /// Hidden octaves (similar motion into an octave)
    pub fn identify_hidden_octaves(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::hidden_octave,
            "Hidden octave",
        )
    }

    /// Dissonances that fail to resolve by the common-practice rules
    pub fn identify_improper_resolutions(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_quartets(
            pair,
            key,
            EvalSpan::all(),
            marker,
            |vlq| RuleOutcome::from_bool(vlq.improper_resolution()),
            |vlq, p1, p2| {
                let opening = vlq
                    .harmonic_first()
                    .map(|iv| iv.nice_name())
                    .unwrap_or_else(|| "interval".to_string());
                format!(
                    "Improper resolution of {} at measure {}: {}",
                    opening,
                    vlq.v1n1.measure(),
                    motion_clause(vlq, p1, p2)
                )
            },
        )
    }

    /// A leap in one voice not set with a step in the other
    pub fn identify_leap_not_set_with_step(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::leap_not_set_with_step,
            "Leap not set with step",
        )
    }

    /// Whether the piece opens without a perfect consonance; only the
    /// very first transition is examined
    pub fn identify_opens_incorrectly(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_quartets(
            pair,
            key,
            EvalSpan::first(),
            marker,
            |vlq| RuleOutcome::from_bool(vlq.opens_incorrectly()),
            |vlq, p1, p2| {
                format!(
                    "The opening harmonic interval is not correct: {}",
                    motion_clause(vlq, p1, p2)
                )
            },
        )
    }

    /// Whether the piece fails to close on a perfect consonance
    /// approached correctly; only the very last transition is examined
    pub fn identify_closes_incorrectly(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_quartets(
            pair,
            key,
            EvalSpan::last(),
            marker,
            |vlq| RuleOutcome::from_bool(vlq.closes_incorrectly()),
            |vlq, p1, p2| {
                format!(
                    "The closing motion and intervals are not correct: {}",
                    motion_clause(vlq, p1, p2)
                )
            },
        )
    }

    /// Oblique motion between two parts
    pub fn identify_oblique_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::oblique_motion,
            "Oblique motion",
        )
    }

    /// Similar motion between two parts
    pub fn identify_similar_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::similar_motion,
            "Similar motion",
        )
    }

    /// Parallel motion between two parts
    pub fn identify_parallel_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::parallel_motion,
            "Parallel motion",
        )
    }

    /// Contrary motion between two parts
    pub fn identify_contrary_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::contrary_motion,
            "Contrary motion",
        )
    }

    /// Contrary motion with the upper voice rising
    pub fn identify_outward_contrary_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::outward_contrary_motion,
            "Outward contrary motion",
        )
    }

    /// Contrary motion with the upper voice falling
    pub fn identify_inward_contrary_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::inward_contrary_motion,
            "Inward contrary motion",
        )
    }

    /// Anti-parallel motion between two parts
    pub fn identify_antiparallel_motion(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_quartet_rule(
            pair,
            marker,
            key,
            EvalSpan::all(),
            VoiceLeadingQuartet::antiparallel_motion,
            "Anti-parallel motion",
        )
    }

    /// Label every transition with its motion classification. The
    /// classification is the finding's value; unpitched transitions
    /// produce no finding.
    pub fn identify_motion_type(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_quartets(
            pair,
            key,
            EvalSpan::all(),
            marker,
            |vlq| match vlq.motion_type() {
                Some(kind) => RuleOutcome::matched(kind.as_str()),
                None => RuleOutcome::NoMatch,
            },
            |vlq, p1, p2| match vlq.motion_type() {
                Some(MotionKind::NoMotion) | None => "No motion".to_string(),
                Some(kind) => format!(
                    "{} Motion at measure {}: {}",
                    kind,
                    vlq.v1n1.measure(),
                    motion_clause(vlq, p1, p2)
                ),
            },
        )
    }

    /// Harmonic intervals that are not consonant
    pub fn identify_dissonant_harmonic_intervals(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_harmonic_intervals(
            pair,
            key,
            marker,
            |interval| {
                RuleOutcome::from_bool(interval.map(|iv| !iv.is_consonant()).unwrap_or(false))
            },
            |interval, p1, p2| match interval {
                Some(iv) => format!(
                    "Dissonant harmonic interval in measure {}: {} from {} to {} between part {} and part {}",
                    iv.start.timing.measure,
                    iv.nice_name(),
                    iv.start.pitch.name(),
                    iv.end.pitch.name(),
                    p1 + 1,
                    p2 + 1
                ),
                None => String::new(),
            },
        )
    }

    /// Melodic intervals from the dissonant set (A2, A4, d5, m7, M7)
    pub fn identify_dissonant_melodic_intervals(
        &mut self,
        part: Option<usize>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_melodic_intervals(
            part,
            key,
            marker,
            |interval| {
                RuleOutcome::from_bool(
                    interval
                        .map(|iv| DISSONANT_MELODIC.contains(iv.simple_name().as_str()))
                        .unwrap_or(false),
                )
            },
            |interval, p| match interval {
                Some(iv) => format!(
                    "Dissonant melodic interval in part {} measure {}: {} from {} to {}",
                    p + 1,
                    iv.start.timing.measure,
                    iv.nice_name(),
                    iv.start.pitch.name(),
                    iv.end.pitch.name()
                ),
                None => String::new(),
            },
        )
    }

    /// Label every present harmonic interval with its generic size.
    /// A unison labels with size 1 and the value is the number itself,
    /// which is why outcomes are never judged by truthiness.
    pub fn identify_harmonic_intervals(
        &mut self,
        pair: Option<(usize, usize)>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_harmonic_intervals(
            pair,
            key,
            marker,
            |interval| match interval {
                Some(iv) => RuleOutcome::matched(iv.generic_undirected() as i64),
                None => RuleOutcome::NoMatch,
            },
            |_, _, _| "harmonic interval".to_string(),
        )
    }

    /// Label every note with its scale degree in the analyzer's key;
    /// pitches foreign to the scale match with the value "none"
    pub fn identify_scale_degrees(
        &mut self,
        part: Option<usize>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        let context = *self.context();
        self.evaluate_symbols(
            part,
            key,
            marker,
            move |symbol| match symbol.pitch() {
                Some(pitch) => RuleOutcome::matched(
                    context
                        .scale_degree_of(pitch)
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                ),
                None => RuleOutcome::NoMatch,
            },
            |_, _| "scale degree".to_string(),
        )
    }

    /// Stepwise three-note shapes whose middle note could be a passing
    /// tone, judged on the part's slice projection alone
    pub fn identify_possible_passing_tones(
        &mut self,
        part: Option<usize>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_windows(
            part,
            key,
            marker,
            |window| RuleOutcome::from_bool(window.could_be_passing_tone()),
            |window, p| {
                format!(
                    "{} in part {} identified as a possible passing tone",
                    window.middle().name(),
                    p + 1
                )
            },
        )
    }

    /// Passing tones confirmed dissonant on the weak middle
    /// simultaneity
    pub fn identify_unaccented_passing_tones(
        &mut self,
        part: Option<usize>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_triplets(
            part,
            key,
            marker,
            |triplet, p| RuleOutcome::from_bool(triplet.has_unaccented_passing_tone(p)),
            |triplet, p| {
                format!(
                    "{} in part {} identified as an unaccented passing tone",
                    triplet.second().symbol(p).name(),
                    p + 1
                )
            },
        )
    }

    /// Neighbor tones confirmed dissonant on the weak middle
    /// simultaneity
    pub fn identify_unaccented_neighbor_tones(
        &mut self,
        part: Option<usize>,
        marker: Option<&str>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.evaluate_triplets(
            part,
            key,
            marker,
            |triplet, p| RuleOutcome::from_bool(triplet.has_unaccented_neighbor_tone(p)),
            |triplet, p| {
                format!(
                    "{} in part {} identified as an unaccented neighbor tone",
                    triplet.second().symbol(p).name(),
                    p + 1
                )
            },
        )
    }

    /// Run every common-practice error rule under one shared key, each
    /// with its traditional highlight marker. Findings interleave in
    /// call order.
    pub fn identify_common_practice_errors(
        &mut self,
        pair: Option<(usize, usize)>,
        key: &str,
    ) -> Result<(), AnalysisError> {
        self.identify_parallel_fifths(pair, Some("red"), key)?;
        self.identify_parallel_octaves(pair, Some("orange"), key)?;
        self.identify_hidden_fifths(pair, Some("yellow"), key)?;
        self.identify_hidden_octaves(pair, Some("green"), key)?;
        self.identify_parallel_unisons(pair, Some("blue"), key)?;
        self.identify_improper_resolutions(pair, Some("purple"), key)?;
        self.identify_leap_not_set_with_step(pair, Some("white"), key)?;
        self.identify_dissonant_harmonic_intervals(pair, Some("magenta"), key)?;
        self.identify_dissonant_melodic_intervals(None, Some("cyan"), key)?;
        Ok(())
    }
}
