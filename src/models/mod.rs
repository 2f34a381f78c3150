//! Score model: pitches, intervals, symbols, parts and tonal context
//!
//! This is the collaborator surface the analysis layer consumes. It is
//! deliberately small: spelled pitches, interval arithmetic, timed
//! symbols and a tonic/mode pair. Naming sophistication beyond what the
//! rules exercise is out of scope.

pub mod interval;
pub mod pitch;
pub mod score;
pub mod symbol;
pub mod tonic;

pub use interval::{Interval, IntervalQuality};
pub use pitch::{Accidental, Pitch, Step};
pub use score::{Part, Score};
pub use symbol::{Chord, Note, Rational, Rest, Symbol, Timing};
pub use tonic::{Mode, TonalContext, Tonic};
