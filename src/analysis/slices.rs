//! Vertical slices: cross-part simultaneities
//!
//! The slice list is built from the combined rhythm of all parts, so
//! its length is driven by rhythmic alignment, not by any single
//! part's event count. Parts that are silent at a slice time carry
//! `Symbol::Absent` there.

use serde::{Deserialize, Serialize};

use super::segment::LinearWindow;
use crate::models::{Interval, Rational, Score, Symbol};

/// A snapshot across all parts at one shared onset time
///
/// Invariant: `symbols.len()` equals the score's part count for every
/// slice, and the builder produces slices in strictly increasing onset
/// order with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalSlice {
    onset: Rational,
    symbols: Vec<Symbol>,
}

impl VerticalSlice {
    /// The shared onset time of this slice
    pub fn onset(&self) -> Rational {
        self.onset
    }

    /// The symbol contributed by `part` (may be `Absent`)
    pub fn symbol(&self, part: usize) -> &Symbol {
        &self.symbols[part]
    }

    /// All per-part symbols, indexed by part
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of parts represented (equals the score's part count)
    pub fn num_parts(&self) -> usize {
        self.symbols.len()
    }

    /// Whether every part sounds a pitch at this slice
    pub fn is_complete(&self) -> bool {
        self.symbols.iter().all(|s| s.is_pitched())
    }

    /// Measure number of the first pitched symbol, 0 if none
    pub fn measure(&self) -> u32 {
        self.symbols
            .iter()
            .find(|s| s.is_pitched())
            .map(|s| s.measure())
            .unwrap_or(0)
    }
}

/// Build the ordered slice list from the combined rhythm of the score
pub fn build_slices(score: &Score) -> Vec<VerticalSlice> {
    let onsets = score.combined_onsets();
    let slices: Vec<VerticalSlice> = onsets
        .into_iter()
        .map(|onset| VerticalSlice {
            onset,
            symbols: (0..score.num_parts())
                .map(|part| score.symbol_at(part, onset))
                .collect(),
        })
        .collect();
    log::debug!(
        "built {} vertical slices over {} parts",
        slices.len(),
        score.num_parts()
    );
    slices
}

/// Three consecutive vertical slices treated as one analytical unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalSliceTriplet {
    first: VerticalSlice,
    second: VerticalSlice,
    third: VerticalSlice,
}

impl VerticalSliceTriplet {
    /// Group three consecutive slices
    pub fn new(first: VerticalSlice, second: VerticalSlice, third: VerticalSlice) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub fn first(&self) -> &VerticalSlice {
        &self.first
    }

    pub fn second(&self) -> &VerticalSlice {
        &self.second
    }

    pub fn third(&self) -> &VerticalSlice {
        &self.third
    }

    /// The three-symbol window this triplet embeds for one part
    pub fn window(&self, part: usize) -> LinearWindow {
        LinearWindow::new(
            part,
            vec![
                self.first.symbol(part).clone(),
                self.second.symbol(part).clone(),
                self.third.symbol(part).clone(),
            ],
        )
    }

    /// Whether `part`'s symbol in the middle slice is dissonant against
    /// at least one other sounding part
    pub fn middle_is_dissonant(&self, part: usize) -> bool {
        let target = self.second.symbol(part);
        if !target.is_pitched() {
            return false;
        }
        (0..self.second.num_parts())
            .filter(|&other| other != part)
            .filter_map(|other| Interval::between(self.second.symbol(other), target))
            .any(|iv| !iv.is_consonant())
    }

    /// Unaccented passing tone in `part`: the embedded window has the
    /// passing shape and the middle symbol is dissonant on the weak
    /// middle simultaneity
    pub fn has_unaccented_passing_tone(&self, part: usize) -> bool {
        self.window(part).could_be_passing_tone() && self.middle_is_dissonant(part)
    }

    /// Unaccented neighbor tone in `part`: neighbor shape plus middle
    /// dissonance
    pub fn has_unaccented_neighbor_tone(&self, part: usize) -> bool {
        self.window(part).could_be_neighbor_tone() && self.middle_is_dissonant(part)
    }
}

/// Sliding window of length 3 over the global slice list
pub fn build_triplets(slices: &[VerticalSlice]) -> Vec<VerticalSliceTriplet> {
    slices
        .windows(3)
        .map(|w| VerticalSliceTriplet::new(w[0].clone(), w[1].clone(), w[2].clone()))
        .collect()
}
