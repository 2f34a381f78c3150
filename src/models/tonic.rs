//! Tonal context: tonic and mode
//!
//! The analyzer itself treats the tonal context as opaque and only
//! threads it through to voice-leading quartets; the scale-degree rule
//! is the one consumer of the degree lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::pitch::Pitch;

/// Enumeration of the commonly used tonic pitches (key centers)
///
/// Enharmonic equivalents are listed separately (e.g., C# and Db)
/// because they imply different spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tonic {
    C,
    #[serde(rename = "C#")]
    Cs,
    Db,
    D,
    #[serde(rename = "D#")]
    Ds,
    Eb,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    Gb,
    G,
    #[serde(rename = "G#")]
    Gs,
    Ab,
    A,
    #[serde(rename = "A#")]
    As,
    Bb,
    B,
}

impl Tonic {
    /// Convert tonic to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Tonic::C => "C",
            Tonic::Cs => "C#",
            Tonic::Db => "Db",
            Tonic::D => "D",
            Tonic::Ds => "D#",
            Tonic::Eb => "Eb",
            Tonic::E => "E",
            Tonic::F => "F",
            Tonic::Fs => "F#",
            Tonic::Gb => "Gb",
            Tonic::G => "G",
            Tonic::Gs => "G#",
            Tonic::Ab => "Ab",
            Tonic::A => "A",
            Tonic::As => "A#",
            Tonic::Bb => "Bb",
            Tonic::B => "B",
        }
    }

    /// Pitch class of this tonic (C = 0)
    pub fn pitch_class(&self) -> i32 {
        match self {
            Tonic::C => 0,
            Tonic::Cs | Tonic::Db => 1,
            Tonic::D => 2,
            Tonic::Ds | Tonic::Eb => 3,
            Tonic::E => 4,
            Tonic::F => 5,
            Tonic::Fs | Tonic::Gb => 6,
            Tonic::G => 7,
            Tonic::Gs | Tonic::Ab => 8,
            Tonic::A => 9,
            Tonic::As | Tonic::Bb => 10,
            Tonic::B => 11,
        }
    }
}

impl fmt::Display for Tonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tonic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-insensitive parsing
        match s.to_uppercase().as_str() {
            "C" => Ok(Tonic::C),
            "C#" | "CS" | "C♯" => Ok(Tonic::Cs),
            "DB" | "D♭" => Ok(Tonic::Db),
            "D" => Ok(Tonic::D),
            "D#" | "DS" | "D♯" => Ok(Tonic::Ds),
            "EB" | "E♭" => Ok(Tonic::Eb),
            "E" => Ok(Tonic::E),
            "F" => Ok(Tonic::F),
            "F#" | "FS" | "F♯" => Ok(Tonic::Fs),
            "GB" | "G♭" => Ok(Tonic::Gb),
            "G" => Ok(Tonic::G),
            "G#" | "GS" | "G♯" => Ok(Tonic::Gs),
            "AB" | "A♭" => Ok(Tonic::Ab),
            "A" => Ok(Tonic::A),
            "A#" | "AS" | "A♯" => Ok(Tonic::As),
            "BB" | "B♭" => Ok(Tonic::Bb),
            "B" => Ok(Tonic::B),
            _ => Err(format!("invalid tonic: '{}'", s)),
        }
    }
}

/// Major or minor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Pitch-class offsets of the seven scale degrees
    fn degree_offsets(&self) -> [i32; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// The prevailing key, passed through analysis without interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TonalContext {
    pub tonic: Tonic,
    pub mode: Mode,
}

impl TonalContext {
    /// Create a tonal context
    pub fn new(tonic: Tonic, mode: Mode) -> Self {
        Self { tonic, mode }
    }

    /// Scale degree (1-7) of a pitch in this key, `None` if the pitch
    /// class is foreign to the scale
    pub fn scale_degree_of(&self, pitch: &Pitch) -> Option<u8> {
        let relative = (pitch.pitch_class() - self.tonic.pitch_class()).rem_euclid(12);
        self.mode
            .degree_offsets()
            .iter()
            .position(|&offset| offset == relative)
            .map(|i| i as u8 + 1)
    }
}

impl fmt::Display for TonalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tonic, self.mode)
    }
}
