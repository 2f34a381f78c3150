//! Timed symbols: the events a part is made of
//!
//! A `Symbol` is one timed event in a part: a pitched note, a chord, a
//! rest, or `Absent`. `Absent` is a first-class value, not an error: it
//! is what the slice projection yields when no playable event covers a
//! time point, and every derived view tolerates it.

use serde::{Deserialize, Serialize};

use super::pitch::Pitch;

/// Rational quarter-length offsets and durations
pub type Rational = num_rational::Rational32;

/// Onset, duration and measure attribution for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Offset from the start of the part, in quarter lengths
    pub onset: Rational,

    /// Duration in quarter lengths
    pub duration: Rational,

    /// Measure number this event falls in
    pub measure: u32,
}

impl Timing {
    /// Create a new timing
    pub fn new(onset: Rational, duration: Rational, measure: u32) -> Self {
        Self {
            onset,
            duration,
            measure,
        }
    }

    /// The offset at which this event ends
    pub fn end(&self) -> Rational {
        self.onset + self.duration
    }
}

/// A pitched note event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub timing: Timing,

    /// Display marker set by result annotation (highlight color etc.)
    pub marker: Option<String>,
}

/// A chord event (two or more sounding pitches)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Sounding pitches, lowest first
    pub pitches: Vec<Pitch>,
    pub timing: Timing,

    /// Display marker set by result annotation (highlight color etc.)
    pub marker: Option<String>,
}

/// A rest event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub timing: Timing,
}

/// One timed musical event, or the explicit absence of one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Note(Note),
    Chord(Chord),
    Rest(Rest),

    /// No playable event covers this time point
    Absent,
}

impl Symbol {
    /// Create a note symbol
    pub fn note(pitch: Pitch, timing: Timing) -> Self {
        Symbol::Note(Note {
            pitch,
            timing,
            marker: None,
        })
    }

    /// Create a chord symbol
    pub fn chord(pitches: Vec<Pitch>, timing: Timing) -> Self {
        Symbol::Chord(Chord {
            pitches,
            timing,
            marker: None,
        })
    }

    /// Create a rest symbol
    pub fn rest(timing: Timing) -> Self {
        Symbol::Rest(Rest { timing })
    }

    /// Whether this symbol carries at least one pitch
    pub fn is_pitched(&self) -> bool {
        matches!(self, Symbol::Note(_) | Symbol::Chord(_))
    }

    /// Whether this symbol is the absence sentinel
    pub fn is_absent(&self) -> bool {
        matches!(self, Symbol::Absent)
    }

    /// The representative pitch: a note's pitch, or a chord's lowest
    pub fn pitch(&self) -> Option<&Pitch> {
        match self {
            Symbol::Note(n) => Some(&n.pitch),
            Symbol::Chord(c) => c.pitches.first(),
            _ => None,
        }
    }

    /// Timing of the underlying event (`None` for `Absent`)
    pub fn timing(&self) -> Option<Timing> {
        match self {
            Symbol::Note(n) => Some(n.timing),
            Symbol::Chord(c) => Some(c.timing),
            Symbol::Rest(r) => Some(r.timing),
            Symbol::Absent => None,
        }
    }

    /// Measure number of the underlying event, 0 for `Absent`
    pub fn measure(&self) -> u32 {
        self.timing().map(|t| t.measure).unwrap_or(0)
    }

    /// Pitch name without octave (e.g. "D"), or "rest"/"absent"
    pub fn name(&self) -> String {
        match self {
            Symbol::Note(n) => n.pitch.name(),
            Symbol::Chord(c) => c
                .pitches
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(" "),
            Symbol::Rest(_) => "rest".to_string(),
            Symbol::Absent => "absent".to_string(),
        }
    }

    /// Set the display marker (no-op for rests and `Absent`)
    pub fn set_marker(&mut self, marker: &str) {
        match self {
            Symbol::Note(n) => n.marker = Some(marker.to_string()),
            Symbol::Chord(c) => c.marker = Some(marker.to_string()),
            _ => {}
        }
    }

    /// The current display marker, if any
    pub fn marker(&self) -> Option<&str> {
        match self {
            Symbol::Note(n) => n.marker.as_deref(),
            Symbol::Chord(c) => c.marker.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter(onset: i32) -> Timing {
        Timing::new(Rational::from_integer(onset), Rational::from_integer(1), 1)
    }

    #[test]
    fn test_pitched_and_absent() {
        let n = Symbol::note("c4".parse().unwrap(), quarter(0));
        assert!(n.is_pitched());
        assert_eq!(n.name(), "C");

        let r = Symbol::rest(quarter(1));
        assert!(!r.is_pitched());
        assert!(!r.is_absent());

        assert!(Symbol::Absent.is_absent());
        assert_eq!(Symbol::Absent.pitch(), None);
        assert_eq!(Symbol::Absent.timing(), None);
    }

    #[test]
    fn test_chord_representative_pitch() {
        let c = Symbol::chord(
            vec!["c3".parse().unwrap(), "e3".parse().unwrap(), "g3".parse().unwrap()],
            quarter(0),
        );
        assert_eq!(c.pitch().unwrap().name(), "C");
        assert_eq!(c.name(), "C E G");
    }

    #[test]
    fn test_marker() {
        let mut n = Symbol::note("g4".parse().unwrap(), quarter(0));
        assert_eq!(n.marker(), None);
        n.set_marker("red");
        assert_eq!(n.marker(), Some("red"));

        let mut r = Symbol::rest(quarter(0));
        r.set_marker("red");
        assert_eq!(r.marker(), None);
    }
}
