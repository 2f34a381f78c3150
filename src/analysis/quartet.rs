//! Voice-leading quartets: pairwise transitions between slices
//!
//! A quartet is the four symbols two parts contribute to two
//! consecutive slices. All classification predicates answer `false`
//! when any of the four symbols is unpitched: an absent voice cannot
//! exhibit a motion fault.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Interval, Symbol, TonalContext};

/// Classification of the combined motion of two voices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionKind {
    NoMotion,
    Oblique,
    Parallel,
    Similar,
    AntiParallel,
    Contrary,
}

impl MotionKind {
    /// Display label used in finding texts
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionKind::NoMotion => "No Motion",
            MotionKind::Oblique => "Oblique",
            MotionKind::Parallel => "Parallel",
            MotionKind::Similar => "Similar",
            MotionKind::AntiParallel => "Anti-Parallel",
            MotionKind::Contrary => "Contrary",
        }
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Two consecutive slices restricted to one part pair
///
/// `v1n1`/`v1n2` are the first part's symbols at the earlier and later
/// slice, `v2n1`/`v2n2` the second part's. The first part is treated
/// as the upper voice when computing harmonic intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceLeadingQuartet {
    pub part1: usize,
    pub part2: usize,
    pub v1n1: Symbol,
    pub v1n2: Symbol,
    pub v2n1: Symbol,
    pub v2n2: Symbol,

    /// Prevailing key, carried through without interpretation
    pub context: TonalContext,
}

impl VoiceLeadingQuartet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        part1: usize,
        part2: usize,
        v1n1: Symbol,
        v1n2: Symbol,
        v2n1: Symbol,
        v2n2: Symbol,
        context: TonalContext,
    ) -> Self {
        Self {
            part1,
            part2,
            v1n1,
            v1n2,
            v2n1,
            v2n2,
            context,
        }
    }

    /// Harmonic interval at the earlier slice (lower voice up)
    pub fn harmonic_first(&self) -> Option<Interval> {
        Interval::between(&self.v2n1, &self.v1n1)
    }

    /// Harmonic interval at the later slice (lower voice up)
    pub fn harmonic_second(&self) -> Option<Interval> {
        Interval::between(&self.v2n2, &self.v1n2)
    }

    /// Melodic interval of the first voice across the transition
    pub fn melodic_first(&self) -> Option<Interval> {
        Interval::between(&self.v1n1, &self.v1n2)
    }

    /// Melodic interval of the second voice across the transition
    pub fn melodic_second(&self) -> Option<Interval> {
        Interval::between(&self.v2n1, &self.v2n2)
    }

    /// Whether all four symbols are pitched
    pub fn is_complete(&self) -> bool {
        self.v1n1.is_pitched()
            && self.v1n2.is_pitched()
            && self.v2n1.is_pitched()
            && self.v2n2.is_pitched()
    }

    fn voice1_moves(&self) -> bool {
        self.v1n1.pitch() != self.v1n2.pitch()
    }

    fn voice2_moves(&self) -> bool {
        self.v2n1.pitch() != self.v2n2.pitch()
    }

    fn directions(&self) -> Option<(i32, i32)> {
        Some((self.melodic_first()?.direction(), self.melodic_second()?.direction()))
    }

    /// Neither voice changes pitch
    pub fn no_motion(&self) -> bool {
        self.is_complete() && !self.voice1_moves() && !self.voice2_moves()
    }

    /// Exactly one voice moves
    pub fn oblique_motion(&self) -> bool {
        self.is_complete() && (self.voice1_moves() != self.voice2_moves())
    }

    /// Both voices move in the same direction
    pub fn similar_motion(&self) -> bool {
        if !self.is_complete() || !self.voice1_moves() || !self.voice2_moves() {
            return false;
        }
        match self.directions() {
            Some((d1, d2)) => d1 == d2 && d1 != 0,
            None => false,
        }
    }

    /// Similar motion preserving the harmonic interval size
    pub fn parallel_motion(&self) -> bool {
        if !self.similar_motion() {
            return false;
        }
        match (self.harmonic_first(), self.harmonic_second()) {
            (Some(first), Some(second)) => first.simple_name() == second.simple_name(),
            _ => false,
        }
    }

    /// Both voices move, in opposite directions
    pub fn contrary_motion(&self) -> bool {
        if !self.is_complete() || !self.voice1_moves() || !self.voice2_moves() {
            return false;
        }
        match self.directions() {
            Some((d1, d2)) => d1 != 0 && d2 != 0 && d1 == -d2,
            None => false,
        }
    }

    /// Contrary motion with the upper voice rising
    pub fn outward_contrary_motion(&self) -> bool {
        self.contrary_motion()
            && self
                .melodic_first()
                .map(|iv| iv.direction() == 1)
                .unwrap_or(false)
    }

    /// Contrary motion with the upper voice falling
    pub fn inward_contrary_motion(&self) -> bool {
        self.contrary_motion()
            && self
                .melodic_first()
                .map(|iv| iv.direction() == -1)
                .unwrap_or(false)
    }

    /// Contrary motion that lands on the same simple harmonic interval
    pub fn antiparallel_motion(&self) -> bool {
        if !self.contrary_motion() {
            return false;
        }
        match (self.harmonic_first(), self.harmonic_second()) {
            (Some(first), Some(second)) => first.simple_name() == second.simple_name(),
            _ => false,
        }
    }

    /// Classify the transition, `None` when any voice is unpitched
    pub fn motion_type(&self) -> Option<MotionKind> {
        if !self.is_complete() {
            return None;
        }
        if self.no_motion() {
            Some(MotionKind::NoMotion)
        } else if self.oblique_motion() {
            Some(MotionKind::Oblique)
        } else if self.parallel_motion() {
            Some(MotionKind::Parallel)
        } else if self.similar_motion() {
            Some(MotionKind::Similar)
        } else if self.antiparallel_motion() {
            Some(MotionKind::AntiParallel)
        } else if self.contrary_motion() {
            Some(MotionKind::Contrary)
        } else {
            None
        }
    }

    /// Parallel motion holding the given simple interval (e.g. "P5")
    pub fn parallel_interval(&self, simple_name: &str) -> bool {
        self.parallel_motion()
            && self
                .harmonic_second()
                .map(|iv| iv.simple_name() == simple_name)
                .unwrap_or(false)
    }

    pub fn parallel_fifth(&self) -> bool {
        self.parallel_interval("P5")
    }

    pub fn parallel_octave(&self) -> bool {
        self.parallel_interval("P8")
    }

    pub fn parallel_unison(&self) -> bool {
        self.parallel_interval("P1")
    }

    /// Similar (but not parallel) motion arriving at the given simple
    /// interval
    pub fn hidden_interval(&self, simple_name: &str) -> bool {
        self.similar_motion()
            && !self.parallel_motion()
            && self
                .harmonic_second()
                .map(|iv| iv.simple_name() == simple_name)
                .unwrap_or(false)
    }

    pub fn hidden_fifth(&self) -> bool {
        self.hidden_interval("P5")
    }

    pub fn hidden_octave(&self) -> bool {
        self.hidden_interval("P8")
    }

    /// A dissonant opening interval that fails to resolve as the
    /// common-practice rules require: d5 inward to a third, A4 outward
    /// to a sixth, m7 inward to a third. Other openings never flag.
    pub fn improper_resolution(&self) -> bool {
        let first = match self.harmonic_first() {
            Some(iv) => iv,
            None => return false,
        };
        let second = match self.harmonic_second() {
            Some(iv) => iv,
            None => return false,
        };

        match first.simple_name().as_str() {
            "d5" => !(self.inward_contrary_motion() && second.generic_simple() == 3),
            "A4" => !(self.outward_contrary_motion() && second.generic_simple() == 6),
            "m7" => !(self.inward_contrary_motion() && second.generic_simple() == 3),
            _ => false,
        }
    }

    /// A skip in one voice not balanced by a step (or held tone) in the
    /// other
    pub fn leap_not_set_with_step(&self) -> bool {
        let m1 = match self.melodic_first() {
            Some(iv) => iv,
            None => return false,
        };
        let m2 = match self.melodic_second() {
            Some(iv) => iv,
            None => return false,
        };

        if m1.is_skip() {
            !(m2.is_step() || m2.is_generic_unison())
        } else if m2.is_skip() {
            !(m1.is_step() || m1.is_generic_unison())
        } else {
            false
        }
    }

    /// Opening transition whose first harmonic interval is not a
    /// perfect consonance
    pub fn opens_incorrectly(&self) -> bool {
        match self.harmonic_first() {
            Some(iv) => !matches!(iv.simple_name().as_str(), "P1" | "P5" | "P8"),
            None => false,
        }
    }

    /// Closing transition that does not settle on a perfect unison or
    /// octave approached by contrary or oblique motion
    pub fn closes_incorrectly(&self) -> bool {
        match self.harmonic_second() {
            Some(iv) => {
                let settled = matches!(iv.simple_name().as_str(), "P1" | "P8");
                let approach = self.contrary_motion() || self.oblique_motion();
                !(settled && approach)
            }
            None => false,
        }
    }
}
