//! Pitch representation for analysis
//!
//! A pitch is a spelled step letter plus an accidental and an octave.
//! Spelling is preserved (F# and Gb are distinct) because interval
//! quality depends on the diatonic distance between step letters, not
//! just the sounding semitone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven diatonic step letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Diatonic index within the octave (C = 0 .. B = 6)
    pub fn index(&self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 1,
            Step::E => 2,
            Step::F => 3,
            Step::G => 4,
            Step::A => 5,
            Step::B => 6,
        }
    }

    /// Semitones above C for the natural form of this step
    pub fn semitones(&self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => 5,
            Step::G => 7,
            Step::A => 9,
            Step::B => 11,
        }
    }

    /// Convert step to its letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        }
    }

    /// Parse a step from a single letter (case-insensitive)
    pub fn parse(c: char) -> Option<Step> {
        match c.to_ascii_uppercase() {
            'C' => Some(Step::C),
            'D' => Some(Step::D),
            'E' => Some(Step::E),
            'F' => Some(Step::F),
            'G' => Some(Step::G),
            'A' => Some(Step::A),
            'B' => Some(Step::B),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accidental applied to a step letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    /// No accidental
    Natural,

    /// Sharp (#)
    Sharp,

    /// Double sharp (##)
    DoubleSharp,

    /// Flat (b)
    Flat,

    /// Double flat (bb)
    DoubleFlat,
}

impl Accidental {
    /// Get the symbol for this accidental
    pub fn symbol(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
            Accidental::Flat => "b",
            Accidental::DoubleFlat => "bb",
        }
    }

    /// Get the semitone offset for this accidental
    pub fn semitone_offset(&self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
            Accidental::Flat => -1,
            Accidental::DoubleFlat => -2,
        }
    }

    /// Parse accidental from a string
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "##" => Some(Accidental::DoubleSharp),
            "#" => Some(Accidental::Sharp),
            "bb" => Some(Accidental::DoubleFlat),
            "b" => Some(Accidental::Flat),
            "" | "♮" => Some(Accidental::Natural),
            _ => None,
        }
    }
}

/// A spelled pitch with octave information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    /// Step letter (C, D, E, ...)
    pub step: Step,

    /// Accidental (sharp, flat, etc.)
    pub accidental: Accidental,

    /// Octave number (middle C = C4)
    pub octave: i8,
}

impl Pitch {
    /// Create a new pitch
    pub fn new(step: Step, accidental: Accidental, octave: i8) -> Self {
        Self {
            step,
            accidental,
            octave,
        }
    }

    /// Get the MIDI note number (C4 = 60)
    pub fn midi_number(&self) -> i32 {
        self.step.semitones() + self.accidental.semitone_offset() + (self.octave as i32 + 1) * 12
    }

    /// Pitch class 0-11 (C = 0)
    pub fn pitch_class(&self) -> i32 {
        self.midi_number().rem_euclid(12)
    }

    /// Absolute diatonic position: octave * 7 + step index.
    /// Interval sizes are differences of this value.
    pub fn diatonic_index(&self) -> i32 {
        self.octave as i32 * 7 + self.step.index()
    }

    /// The pitch name without octave (e.g. "D", "F#")
    pub fn name(&self) -> String {
        format!("{}{}", self.step, self.accidental.symbol())
    }

    /// The full pitch notation with octave (e.g. "F#3")
    pub fn notation(&self) -> String {
        format!("{}{}{}", self.step, self.accidental.symbol(), self.octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

impl FromStr for Pitch {
    type Err = String;

    /// Parse pitch notation like "c4", "F#3" or "Bb2"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let step = chars
            .next()
            .and_then(Step::parse)
            .ok_or_else(|| format!("invalid pitch: '{}'", s))?;

        let rest: String = chars.collect();
        let split = rest
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .unwrap_or(rest.len());
        let (acc_text, octave_text) = rest.split_at(split);

        let accidental =
            Accidental::parse(acc_text).ok_or_else(|| format!("invalid accidental in '{}'", s))?;
        let octave = octave_text
            .parse::<i8>()
            .map_err(|_| format!("invalid octave in '{}'", s))?;

        Ok(Pitch::new(step, accidental, octave))
    }
}
