// Vertical slice construction from the combined rhythm

use theory_analyzer::{
    Analyzer, Mode, Part, Pitch, Rational, Score, TonalContext, Tonic,
};

fn ql(n: i32) -> Rational {
    Rational::from_integer(n)
}

fn pitch(name: &str) -> Pitch {
    name.parse().unwrap()
}

fn key_c_major() -> TonalContext {
    TonalContext::new(Tonic::C, Mode::Major)
}

/// Helper to build a part of equal-duration notes
fn make_part(names: &[&str], duration: i32) -> Part {
    let mut part = Part::new();
    for name in names {
        part.append_note(pitch(name), ql(duration), 1);
    }
    part
}

#[test]
fn test_slice_count_driven_by_onset_union() {
    // A whole note against two half notes: onsets {0, 2} => 2 slices
    let mut score = Score::new();
    score.add_part(make_part(&["c5"], 4));
    score.add_part(make_part(&["f4", "g4"], 2));

    let analyzer = Analyzer::new(score, key_c_major());
    assert_eq!(analyzer.slices().len(), 2);
    assert_eq!(analyzer.slices()[0].onset(), ql(0));
    assert_eq!(analyzer.slices()[1].onset(), ql(2));
}

#[test]
fn test_long_note_carried_through_later_slices() {
    let mut score = Score::new();
    score.add_part(make_part(&["c5"], 4));
    score.add_part(make_part(&["f4", "g4"], 2));

    let analyzer = Analyzer::new(score, key_c_major());
    let second = &analyzer.slices()[1];
    assert_eq!(second.symbol(0).name(), "C");
    assert_eq!(second.symbol(1).name(), "G");
}

#[test]
fn test_every_slice_has_all_parts() {
    let mut score = Score::new();
    score.add_part(make_part(&["c5", "d5", "e5"], 1));
    score.add_part(make_part(&["c4", "g4"], 2));
    score.add_part(make_part(&["c3"], 4));

    let analyzer = Analyzer::new(score, key_c_major());
    // Onset union: {0, 1, 2} from part 0 plus {0, 2} and {0}
    assert_eq!(analyzer.slices().len(), 3);
    for slice in analyzer.slices() {
        assert_eq!(slice.num_parts(), 3);
    }
}

#[test]
fn test_rests_project_as_absent() {
    let mut score = Score::new();
    let mut p0 = Part::new();
    p0.append_note(pitch("c5"), ql(1), 1);
    p0.append_rest(ql(1), 1);
    p0.append_note(pitch("e5"), ql(1), 1);
    score.add_part(p0);
    score.add_part(make_part(&["c4", "d4", "e4"], 1));

    let analyzer = Analyzer::new(score, key_c_major());
    assert_eq!(analyzer.slices().len(), 3);
    assert!(analyzer.slices()[1].symbol(0).is_absent());
    assert!(!analyzer.slices()[1].is_complete());
    assert!(analyzer.slices()[0].is_complete());
}

#[test]
fn test_unequal_part_lengths_produce_dangling_slices() {
    // The short part simply goes absent-or-held; no validation error
    let mut score = Score::new();
    score.add_part(make_part(&["c5", "d5", "e5", "f5"], 1));
    score.add_part(make_part(&["c4"], 1));

    let analyzer = Analyzer::new(score, key_c_major());
    assert_eq!(analyzer.slices().len(), 4);
    // The single note is carried (at-or-before), not dropped
    assert_eq!(analyzer.slices()[3].symbol(1).name(), "C");
}

#[test]
fn test_slices_strictly_increasing_no_duplicates() {
    let mut score = Score::new();
    score.add_part(make_part(&["c5", "d5", "e5", "g5"], 1));
    score.add_part(make_part(&["c4", "g4", "a4", "c4"], 1));

    let analyzer = Analyzer::new(score, key_c_major());
    let onsets: Vec<Rational> = analyzer.slices().iter().map(|s| s.onset()).collect();
    for pair in onsets.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}
