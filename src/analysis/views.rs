//! Memoized derived views
//!
//! Every accessor computes its view once per distinct key and hands
//! out the cached sequence afterward (`Rc`-shared, so identity is
//! stable across calls). Rules iterate these sequences while the
//! result store is being written, which is exactly why they must not
//! be recomputed mid-analysis.

use std::rc::Rc;

use super::error::AnalysisError;
use super::quartet::VoiceLeadingQuartet;
use super::segment::LinearWindow;
use super::slices::{build_triplets, VerticalSlice, VerticalSliceTriplet};
use super::Analyzer;
use crate::models::Interval;

impl Analyzer {
    /// Validate a part index against the score
    pub(super) fn check_part(&self, part: usize) -> Result<(), AnalysisError> {
        if part < self.score.num_parts() {
            Ok(())
        } else {
            Err(AnalysisError::PartOutOfRange {
                index: part,
                num_parts: self.score.num_parts(),
            })
        }
    }

    fn check_pair(&self, part1: usize, part2: usize) -> Result<(), AnalysisError> {
        self.check_part(part1)?;
        self.check_part(part2)
    }

    /// The ordered slice list (built at construction)
    pub fn slices(&self) -> &[VerticalSlice] {
        &self.slices
    }

    /// All unordered part pairs in canonical (ascending, lexicographic)
    /// enumeration order
    pub fn all_part_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.score.num_parts();
        let mut pairs = Vec::new();
        for part1 in 0..n {
            for part2 in (part1 + 1)..n {
                pairs.push((part1, part2));
            }
        }
        pairs
    }

    /// Harmonic interval per slice between two parts, `None` where
    /// either voice is absent. `part2` is taken as the lower voice.
    pub fn harmonic_intervals(
        &mut self,
        part1: usize,
        part2: usize,
    ) -> Result<Rc<Vec<Option<Interval>>>, AnalysisError> {
        self.check_pair(part1, part2)?;
        if let Some(cached) = self.harmonic_cache.get(&(part1, part2)) {
            return Ok(Rc::clone(cached));
        }

        let intervals: Vec<Option<Interval>> = self
            .slices
            .iter()
            .map(|slice| Interval::between(slice.symbol(part2), slice.symbol(part1)))
            .collect();
        let view = Rc::new(intervals);
        self.harmonic_cache.insert((part1, part2), Rc::clone(&view));
        Ok(view)
    }

    /// Melodic intervals over one part's own note sequence (not the
    /// slice projection, so other parts' rhythms don't split them);
    /// `None` where either side of a pair is unpitched
    pub fn melodic_intervals(
        &mut self,
        part: usize,
    ) -> Result<Rc<Vec<Option<Interval>>>, AnalysisError> {
        self.check_part(part)?;
        if let Some(cached) = self.melodic_cache.get(&part) {
            return Ok(Rc::clone(cached));
        }

        let notes = self.score.parts()[part].note_view();
        let intervals: Vec<Option<Interval>> = notes
            .windows(2)
            .map(|pair| Interval::between(&pair[0], &pair[1]))
            .collect();
        let view = Rc::new(intervals);
        self.melodic_cache.insert(part, Rc::clone(&view));
        Ok(view)
    }

    /// Voice-leading quartets for a part pair, one per consecutive
    /// slice pair.
    ///
    /// The cache key is the ordered "part1,part2" string exactly as
    /// supplied: `(1,0)` occupies a different entry than `(0,1)`.
    /// Callers are expected to pass pairs in a consistent order; the
    /// canonical enumeration always uses ascending pairs.
    pub fn transition_quartets(
        &mut self,
        part1: usize,
        part2: usize,
    ) -> Result<Rc<Vec<VoiceLeadingQuartet>>, AnalysisError> {
        self.check_pair(part1, part2)?;
        let cache_key = format!("{},{}", part1, part2);
        if let Some(cached) = self.vlq_cache.get(&cache_key) {
            return Ok(Rc::clone(cached));
        }

        let quartets: Vec<VoiceLeadingQuartet> = self
            .slices
            .windows(2)
            .map(|pair| {
                VoiceLeadingQuartet::new(
                    part1,
                    part2,
                    pair[0].symbol(part1).clone(),
                    pair[1].symbol(part1).clone(),
                    pair[0].symbol(part2).clone(),
                    pair[1].symbol(part2).clone(),
                    self.context,
                )
            })
            .collect();
        let view = Rc::new(quartets);
        self.vlq_cache.insert(cache_key, Rc::clone(&view));
        Ok(view)
    }

    /// Sliding windows of `length` over one part's slice projection
    pub fn window_segments(
        &mut self,
        part: usize,
        length: usize,
    ) -> Result<Rc<Vec<LinearWindow>>, AnalysisError> {
        self.check_part(part)?;
        if length == 0 {
            return Err(AnalysisError::InvalidWindowLength);
        }
        if let Some(cached) = self.window_cache.get(&(part, length)) {
            return Ok(Rc::clone(cached));
        }

        let windows: Vec<LinearWindow> = self
            .slices
            .windows(length)
            .map(|run| {
                LinearWindow::new(part, run.iter().map(|s| s.symbol(part).clone()).collect())
            })
            .collect();
        let view = Rc::new(windows);
        self.window_cache.insert((part, length), Rc::clone(&view));
        Ok(view)
    }

    /// The length-3 windows the embellishment rules run over
    pub fn three_symbol_windows(
        &mut self,
        part: usize,
    ) -> Result<Rc<Vec<LinearWindow>>, AnalysisError> {
        self.window_segments(part, 3)
    }

    /// Sliding triplets over the global slice list
    pub fn slice_triplets(&mut self) -> Rc<Vec<VerticalSliceTriplet>> {
        if let Some(cached) = &self.triplet_cache {
            return Rc::clone(cached);
        }
        let view = Rc::new(build_triplets(&self.slices));
        self.triplet_cache = Some(Rc::clone(&view));
        view
    }
}
