//! Linear windows: fixed-length runs within one part
//!
//! A window is a consecutive run of symbols from a single part's slice
//! projection. Length 3 is what the embellishment rules work on (the
//! middle symbol is the candidate ornament); the windowing operation
//! itself is general over any length.

use serde::{Deserialize, Serialize};

use crate::models::{Interval, Symbol};

/// A fixed-length run of consecutive symbols from one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWindow {
    part: usize,
    symbols: Vec<Symbol>,
}

impl LinearWindow {
    /// Create a window over `symbols` belonging to `part`
    pub fn new(part: usize, symbols: Vec<Symbol>) -> Self {
        Self { part, symbols }
    }

    /// The part this window was projected from
    pub fn part(&self) -> usize {
        self.part
    }

    /// Window length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols in time order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The middle symbol (the ornament candidate in length-3 windows)
    pub fn middle(&self) -> &Symbol {
        &self.symbols[self.symbols.len() / 2]
    }

    /// Whether the window traces a passing-tone shape: three pitched
    /// symbols moving by step twice in the same direction, spanning a
    /// third overall
    pub fn could_be_passing_tone(&self) -> bool {
        if self.symbols.len() != 3 {
            return false;
        }
        let left = match Interval::between(&self.symbols[0], &self.symbols[1]) {
            Some(iv) => iv,
            None => return false,
        };
        let right = match Interval::between(&self.symbols[1], &self.symbols[2]) {
            Some(iv) => iv,
            None => return false,
        };
        let outer = match Interval::between(&self.symbols[0], &self.symbols[2]) {
            Some(iv) => iv,
            None => return false,
        };

        left.is_step()
            && right.is_step()
            && left.direction() == right.direction()
            && left.direction() != 0
            && outer.generic_undirected() == 3
    }

    /// Whether the window traces a neighbor-tone shape: a step away
    /// from a pitch and a step straight back to it
    pub fn could_be_neighbor_tone(&self) -> bool {
        if self.symbols.len() != 3 {
            return false;
        }
        let left = match Interval::between(&self.symbols[0], &self.symbols[1]) {
            Some(iv) => iv,
            None => return false,
        };
        let right = match Interval::between(&self.symbols[1], &self.symbols[2]) {
            Some(iv) => iv,
            None => return false,
        };

        let returns = match (self.symbols[0].pitch(), self.symbols[2].pitch()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };

        left.is_step()
            && right.is_step()
            && left.direction() != 0
            && left.direction() == -right.direction()
            && returns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rational, Timing};

    fn window(names: &[&str]) -> LinearWindow {
        let symbols = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if name.is_empty() {
                    Symbol::Absent
                } else {
                    Symbol::note(
                        name.parse().unwrap(),
                        Timing::new(
                            Rational::from_integer(i as i32),
                            Rational::from_integer(1),
                            1,
                        ),
                    )
                }
            })
            .collect();
        LinearWindow::new(0, symbols)
    }

    #[test]
    fn test_passing_tone_shape() {
        assert!(window(&["c4", "d4", "e4"]).could_be_passing_tone());
        assert!(window(&["e4", "d4", "c4"]).could_be_passing_tone());
        // Leap in, step out
        assert!(!window(&["c4", "e4", "f4"]).could_be_passing_tone());
        // Direction change
        assert!(!window(&["c4", "d4", "c4"]).could_be_passing_tone());
        // Absent middle
        assert!(!window(&["c4", "", "e4"]).could_be_passing_tone());
    }

    #[test]
    fn test_neighbor_tone_shape() {
        assert!(window(&["c4", "d4", "c4"]).could_be_neighbor_tone());
        assert!(window(&["c4", "b3", "c4"]).could_be_neighbor_tone());
        // Doesn't return to the same pitch
        assert!(!window(&["c4", "d4", "e4"]).could_be_neighbor_tone());
        // Leap away
        assert!(!window(&["c4", "e4", "c4"]).could_be_neighbor_tone());
    }

    #[test]
    fn test_middle() {
        let w = window(&["c4", "d4", "e4"]);
        assert_eq!(w.middle().name(), "D");
    }
}
