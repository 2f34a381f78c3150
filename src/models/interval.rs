//! Interval computation between two pitched symbols
//!
//! Quality is derived from the diatonic (spelled) distance measured
//! against the chromatic distance, so enharmonic spellings matter:
//! C4-G4 is a P5 while C4-Abb4 names as a diminished sixth even though
//! both span seven semitones.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::pitch::Pitch;
use super::symbol::{Note, Symbol, Timing};

/// Interval quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQuality {
    DoublyDiminished,
    Diminished,
    Minor,
    Perfect,
    Major,
    Augmented,
    DoublyAugmented,
}

impl IntervalQuality {
    /// Abbreviated letter used in interval names ("P5", "m3", ...)
    pub fn letter(&self) -> &'static str {
        match self {
            IntervalQuality::DoublyDiminished => "dd",
            IntervalQuality::Diminished => "d",
            IntervalQuality::Minor => "m",
            IntervalQuality::Perfect => "P",
            IntervalQuality::Major => "M",
            IntervalQuality::Augmented => "A",
            IntervalQuality::DoublyAugmented => "AA",
        }
    }

    /// Full quality word used in readable names
    pub fn word(&self) -> &'static str {
        match self {
            IntervalQuality::DoublyDiminished => "Doubly Diminished",
            IntervalQuality::Diminished => "Diminished",
            IntervalQuality::Minor => "Minor",
            IntervalQuality::Perfect => "Perfect",
            IntervalQuality::Major => "Major",
            IntervalQuality::Augmented => "Augmented",
            IntervalQuality::DoublyAugmented => "Doubly Augmented",
        }
    }
}

/// The distance between two pitched symbols, with provenance
///
/// `start` and `end` keep copies of the originating notes so labelers
/// and annotation can reach names, measures and onsets without going
/// back to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub quality: IntervalQuality,

    /// Directed diatonic span: `end` minus `start` in step positions
    pub diatonic: i32,

    /// Directed chromatic span in semitones
    pub semitones: i32,

    pub start: Note,
    pub end: Note,
}

/// Semitones in the perfect/major form of a simple generic size (1-7)
fn baseline_semitones(generic_simple: i32) -> i32 {
    match generic_simple {
        1 => 0,
        2 => 2,
        3 => 4,
        4 => 5,
        5 => 7,
        6 => 9,
        7 => 11,
        _ => unreachable!("generic size out of simple range"),
    }
}

fn is_perfect_type(generic_simple: i32) -> bool {
    matches!(generic_simple, 1 | 4 | 5)
}

fn quality_from_offset(perfect_type: bool, diff: i32) -> IntervalQuality {
    if perfect_type {
        match diff {
            0 => IntervalQuality::Perfect,
            1 => IntervalQuality::Augmented,
            -1 => IntervalQuality::Diminished,
            d if d >= 2 => IntervalQuality::DoublyAugmented,
            _ => IntervalQuality::DoublyDiminished,
        }
    } else {
        match diff {
            0 => IntervalQuality::Major,
            -1 => IntervalQuality::Minor,
            1 => IntervalQuality::Augmented,
            -2 => IntervalQuality::Diminished,
            d if d >= 2 => IntervalQuality::DoublyAugmented,
            _ => IntervalQuality::DoublyDiminished,
        }
    }
}

impl Interval {
    /// Compute the interval between two pitches, directed from `from`
    /// to `to`, with explicit timings for provenance
    pub fn new(from: Pitch, from_timing: Timing, to: Pitch, to_timing: Timing) -> Self {
        let diatonic = to.diatonic_index() - from.diatonic_index();
        let semitones = to.midi_number() - from.midi_number();

        let du = diatonic.abs();
        let generic_simple = du % 7 + 1;
        let octaves = du / 7;

        let quality = if du == 0 {
            // Altered unisons keep the sign of the chromatic offset
            quality_from_offset(true, semitones.abs())
        } else {
            let chromatic_simple = semitones.abs() - octaves * 12;
            quality_from_offset(
                is_perfect_type(generic_simple),
                chromatic_simple - baseline_semitones(generic_simple),
            )
        };

        Self {
            quality,
            diatonic,
            semitones,
            start: Note {
                pitch: from,
                timing: from_timing,
                marker: None,
            },
            end: Note {
                pitch: to,
                timing: to_timing,
                marker: None,
            },
        }
    }

    /// Interval between two symbols; `None` unless both are pitched
    pub fn between(from: &Symbol, to: &Symbol) -> Option<Self> {
        match (from.pitch(), to.pitch(), from.timing(), to.timing()) {
            (Some(&p1), Some(&p2), Some(t1), Some(t2)) => Some(Self::new(p1, t1, p2, t2)),
            _ => None,
        }
    }

    /// Interval between two bare pitches (zeroed provenance)
    pub fn between_pitches(from: Pitch, to: Pitch) -> Self {
        let zero = Timing::new(
            num_rational::Rational32::from_integer(0),
            num_rational::Rational32::from_integer(0),
            0,
        );
        Self::new(from, zero, to, zero)
    }

    /// Undirected generic size, compound (octave = 8, tenth = 10)
    pub fn generic_undirected(&self) -> i32 {
        self.diatonic.abs() + 1
    }

    /// Undirected generic size reduced to one octave, except that exact
    /// octave multiples stay an 8 (semi-simple reduction)
    pub fn generic_simple(&self) -> i32 {
        let du = self.diatonic.abs();
        if du > 0 && du % 7 == 0 {
            8
        } else {
            du % 7 + 1
        }
    }

    /// Compound name, e.g. "P5", "m3", "M10"
    pub fn name(&self) -> String {
        format!("{}{}", self.quality.letter(), self.generic_undirected())
    }

    /// Octave-reduced name, e.g. "P12" names as "P5"
    pub fn simple_name(&self) -> String {
        format!("{}{}", self.quality.letter(), self.generic_simple())
    }

    /// Readable name, e.g. "Perfect Fifth"
    pub fn nice_name(&self) -> String {
        let ordinal = match self.generic_undirected() {
            1 => "Unison".to_string(),
            2 => "Second".to_string(),
            3 => "Third".to_string(),
            4 => "Fourth".to_string(),
            5 => "Fifth".to_string(),
            6 => "Sixth".to_string(),
            7 => "Seventh".to_string(),
            8 => "Octave".to_string(),
            9 => "Ninth".to_string(),
            10 => "Tenth".to_string(),
            11 => "Eleventh".to_string(),
            12 => "Twelfth".to_string(),
            13 => "Thirteenth".to_string(),
            n => format!("{}th", n),
        };
        format!("{} {}", self.quality.word(), ordinal)
    }

    /// Consonance under common-practice rules: perfect unisons, fifths
    /// and octaves, plus major/minor thirds and sixths. Fourths count
    /// as dissonant.
    pub fn is_consonant(&self) -> bool {
        match (self.quality, self.generic_simple()) {
            (IntervalQuality::Perfect, 1 | 5 | 8) => true,
            (IntervalQuality::Major | IntervalQuality::Minor, 3 | 6) => true,
            _ => false,
        }
    }

    /// Whether the spelled distance is exactly one step
    pub fn is_step(&self) -> bool {
        self.diatonic.abs() == 1
    }

    /// Whether the spelled distance is a third or larger
    pub fn is_skip(&self) -> bool {
        self.diatonic.abs() >= 2
    }

    /// Whether the two ends share the same position (generic unison)
    pub fn is_generic_unison(&self) -> bool {
        self.diatonic == 0
    }

    /// Melodic direction: 1 up, -1 down, 0 static
    pub fn direction(&self) -> i32 {
        if self.semitones != 0 {
            self.semitones.signum()
        } else {
            self.diatonic.signum()
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
