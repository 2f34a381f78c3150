// Derived view contents and memoization identity

use std::rc::Rc;

use theory_analyzer::{
    AnalysisError, Analyzer, Mode, Part, Pitch, Rational, Score, TonalContext, Tonic,
};

fn ql(n: i32) -> Rational {
    Rational::from_integer(n)
}

fn pitch(name: &str) -> Pitch {
    name.parse().unwrap()
}

fn make_part(names: &[&str]) -> Part {
    let mut part = Part::new();
    for name in names {
        part.append_note(pitch(name), ql(1), 1);
    }
    part
}

fn analyzer_for(parts: Vec<Vec<&str>>) -> Analyzer {
    let mut score = Score::new();
    for names in parts {
        score.add_part(make_part(&names));
    }
    Analyzer::new(score, TonalContext::new(Tonic::C, Mode::Major))
}

#[test]
fn test_harmonic_interval_sequence() {
    let mut analyzer = analyzer_for(vec![vec!["e4", "d4"], vec!["a3", "b3"]]);

    let intervals = analyzer.harmonic_intervals(0, 1).unwrap();
    let names: Vec<String> = intervals
        .iter()
        .map(|iv| iv.as_ref().unwrap().name())
        .collect();
    assert_eq!(names, vec!["P5", "m3"]);
}

#[test]
fn test_harmonic_interval_absent_voice_is_none() {
    let mut score = Score::new();
    let mut p0 = Part::new();
    p0.append_note(pitch("e4"), ql(1), 1);
    p0.append_rest(ql(1), 1);
    score.add_part(p0);
    score.add_part(make_part(&["a3", "b3"]));
    let mut analyzer = Analyzer::new(score, TonalContext::new(Tonic::C, Mode::Major));

    let intervals = analyzer.harmonic_intervals(0, 1).unwrap();
    assert!(intervals[0].is_some());
    assert!(intervals[1].is_none());
}

#[test]
fn test_melodic_interval_sequence() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "g4", "c5"]]);

    let intervals = analyzer.melodic_intervals(0).unwrap();
    assert_eq!(intervals.len(), 2);
    let names: Vec<String> = intervals
        .iter()
        .map(|iv| iv.as_ref().unwrap().name())
        .collect();
    assert_eq!(names, vec!["P5", "P4"]);
}

#[test]
fn test_melodic_intervals_follow_own_rhythm() {
    // The other part's faster rhythm must not split melodic pairs
    let mut score = Score::new();
    let mut p0 = Part::new();
    p0.append_note(pitch("c4"), ql(2), 1);
    p0.append_note(pitch("g4"), ql(2), 1);
    score.add_part(p0);
    score.add_part(make_part(&["c3", "d3", "e3", "f3"]));
    let mut analyzer = Analyzer::new(score, TonalContext::new(Tonic::C, Mode::Major));

    let intervals = analyzer.melodic_intervals(0).unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].as_ref().unwrap().name(), "P5");
}

#[test]
fn test_quartet_view_and_cache_identity() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "g4", "c5"], vec!["d4", "e4", "f5"]]);

    let first = analyzer.transition_quartets(0, 1).unwrap();
    assert_eq!(first.len(), 2);

    // Same key: the very same cached sequence
    let second = analyzer.transition_quartets(0, 1).unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    // Reversed key: a distinct cache entry (keys are not canonicalized)
    let reversed = analyzer.transition_quartets(1, 0).unwrap();
    assert!(!Rc::ptr_eq(&first, &reversed));
    assert_eq!(reversed.len(), 2);
}

#[test]
fn test_view_caches_are_identity_stable() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "d4", "e4"], vec!["c3", "d3", "e3"]]);

    let h1 = analyzer.harmonic_intervals(0, 1).unwrap();
    let h2 = analyzer.harmonic_intervals(0, 1).unwrap();
    assert!(Rc::ptr_eq(&h1, &h2));

    let m1 = analyzer.melodic_intervals(1).unwrap();
    let m2 = analyzer.melodic_intervals(1).unwrap();
    assert!(Rc::ptr_eq(&m1, &m2));

    let w1 = analyzer.three_symbol_windows(0).unwrap();
    let w2 = analyzer.window_segments(0, 3).unwrap();
    assert!(Rc::ptr_eq(&w1, &w2));

    let t1 = analyzer.slice_triplets();
    let t2 = analyzer.slice_triplets();
    assert!(Rc::ptr_eq(&t1, &t2));
}

#[test]
fn test_window_segments_general_lengths() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "d4", "e4", "f4", "g4"]]);

    assert_eq!(analyzer.window_segments(0, 1).unwrap().len(), 5);
    assert_eq!(analyzer.window_segments(0, 3).unwrap().len(), 3);
    assert_eq!(analyzer.window_segments(0, 5).unwrap().len(), 1);
    // Longer than the slice list: no windows, not an error
    assert_eq!(analyzer.window_segments(0, 6).unwrap().len(), 0);
    assert_eq!(
        analyzer.window_segments(0, 0).unwrap_err(),
        AnalysisError::InvalidWindowLength
    );
}

#[test]
fn test_triplet_view_length() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "g4", "c5"], vec!["e4", "f4", "a5"]]);
    assert_eq!(analyzer.slice_triplets().len(), 1);
}

#[test]
fn test_all_part_pairs_enumeration() {
    let analyzer = analyzer_for(vec![vec!["c5"], vec!["g4"], vec!["c4"]]);
    assert_eq!(analyzer.all_part_pairs(), vec![(0, 1), (0, 2), (1, 2)]);

    let four = analyzer_for(vec![vec!["c5"], vec!["g4"], vec!["e4"], vec!["c4"]]);
    // n(n-1)/2 pairs in ascending lexicographic order
    assert_eq!(four.all_part_pairs().len(), 6);
    assert_eq!(
        four.all_part_pairs(),
        vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
    );
}

#[test]
fn test_part_out_of_range_is_an_error() {
    let mut analyzer = analyzer_for(vec![vec!["c4"], vec!["g4"]]);

    let err = analyzer.melodic_intervals(2).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::PartOutOfRange {
            index: 2,
            num_parts: 2
        }
    );
    assert!(analyzer.harmonic_intervals(0, 5).is_err());
    assert!(analyzer.transition_quartets(3, 0).is_err());
}
