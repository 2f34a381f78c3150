// Generic dispatch: selectors, spans, outcome contract, annotation

use theory_analyzer::analysis::rules::keys;
use theory_analyzer::{
    Analyzer, EvalSpan, Mode, Part, Pitch, Rational, RuleOutcome, Score, TonalContext, Tonic,
    Value,
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
fn test_key_created_even_without_matches() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "d4"], vec!["c3", "d3"]]);
    analyzer
        .evaluate_quartets(
            None,
            "never",
            EvalSpan::all(),
            None,
            |_| RuleOutcome::NoMatch,
            |_, _, _| String::new(),
        )
        .unwrap();

    assert_eq!(analyzer.results().get("never"), Some(&[][..]));
}

#[test]
fn test_zero_and_empty_payloads_are_findings() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "d4"], vec!["c3", "d3"]]);

    analyzer
        .evaluate_quartets(
            Some((0, 1)),
            "zeros",
            EvalSpan::all(),
            None,
            |_| RuleOutcome::matched(0),
            |_, _, _| "zero".to_string(),
        )
        .unwrap();
    analyzer
        .evaluate_quartets(
            Some((0, 1)),
            "empties",
            EvalSpan::all(),
            None,
            |_| RuleOutcome::matched(""),
            |_, _, _| "empty".to_string(),
        )
        .unwrap();

    let zeros = analyzer.results().get("zeros").unwrap();
    assert_eq!(zeros.len(), 1);
    assert_eq!(zeros[0].value, Value::Int(0));

    let empties = analyzer.results().get("empties").unwrap();
    assert_eq!(empties.len(), 1);
    assert_eq!(empties[0].value, Value::Text(String::new()));
}

#[test]
fn test_omitted_selector_expands_in_canonical_order() {
    // Three parts, a rule that matches every quartet once
    let mut analyzer = analyzer_for(vec![
        vec!["c5", "d5"],
        vec!["g4", "a4"],
        vec!["c4", "d4"],
    ]);
    analyzer
        .evaluate_quartets(
            None,
            "every",
            EvalSpan::all(),
            None,
            |_| RuleOutcome::from_bool(true),
            |_, p1, p2| format!("{},{}", p1, p2),
        )
        .unwrap();

    let texts: Vec<&str> = analyzer
        .results()
        .get("every")
        .unwrap()
        .iter()
        .map(|f| f.text.as_str())
        .collect();
    // One quartet per pair, pairs in (0,1),(0,2),(1,2) order
    assert_eq!(texts, vec!["0,1", "0,2", "1,2"]);
}

#[test]
fn test_quartet_span_bounds() {
    let mut analyzer = analyzer_for(vec![
        vec!["c5", "d5", "e5", "g5"],
        vec!["c4", "g4", "a4", "c4"],
    ]);

    analyzer
        .evaluate_quartets(
            Some((0, 1)),
            "first-only",
            EvalSpan::first(),
            None,
            |_| RuleOutcome::from_bool(true),
            |vlq, _, _| vlq.v1n1.name(),
        )
        .unwrap();
    analyzer
        .evaluate_quartets(
            Some((0, 1)),
            "last-only",
            EvalSpan::last(),
            None,
            |_| RuleOutcome::from_bool(true),
            |vlq, _, _| vlq.v1n2.name(),
        )
        .unwrap();

    let first = analyzer.results().get("first-only").unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].text, "C");

    let last = analyzer.results().get("last-only").unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].text, "G");
}

#[test]
fn test_selector_out_of_range_errors() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "d4"], vec!["c3", "d3"]]);
    let err = analyzer.evaluate_quartets(
        Some((0, 7)),
        "bad",
        EvalSpan::all(),
        None,
        |_| RuleOutcome::NoMatch,
        |_, _, _| String::new(),
    );
    assert!(err.is_err());
}

#[test]
fn test_annotation_is_opt_in() {
    let mut analyzer = analyzer_for(vec![vec!["d5", "e5"], vec!["g4", "a4"]]);

    // Without a marker nothing is touched
    analyzer
        .identify_parallel_fifths(None, None, keys::PARALLEL_FIFTHS)
        .unwrap();
    for part in analyzer.score().parts() {
        for event in part.events() {
            assert_eq!(event.marker(), None);
        }
    }

    // With a marker every referenced symbol is tagged
    analyzer
        .identify_parallel_fifths(None, Some("red"), "marked")
        .unwrap();
    for part in analyzer.score().parts() {
        for event in part.events() {
            assert_eq!(event.marker(), Some("red"));
        }
    }
}

#[test]
fn test_annotate_results_after_the_fact() {
    let mut analyzer = analyzer_for(vec![vec!["d5", "e5"], vec!["g4", "a4"]]);
    analyzer
        .identify_parallel_fifths(None, None, keys::PARALLEL_FIFTHS)
        .unwrap();
    analyzer.annotate_results("blue", Some(&[keys::PARALLEL_FIFTHS]));

    let marked: usize = analyzer
        .score()
        .parts()
        .iter()
        .flat_map(|p| p.events())
        .filter(|e| e.marker() == Some("blue"))
        .count();
    assert_eq!(marked, 4);
}

#[test]
fn test_harmonic_interval_labels_value_is_generic_size() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "d4"], vec!["c4", "c3"]]);
    analyzer
        .identify_harmonic_intervals(None, None, keys::HARMONIC_INTERVALS)
        .unwrap();

    let findings = analyzer.results().get(keys::HARMONIC_INTERVALS).unwrap();
    assert_eq!(findings.len(), 2);
    // A unison's generic size is 1; a ninth's is 9
    assert_eq!(findings[0].value, Value::Int(1));
    assert_eq!(findings[1].value, Value::Int(9));
}

#[test]
fn test_scale_degree_values() {
    let mut analyzer = analyzer_for(vec![vec!["c4", "f#4", "g4"]]);
    analyzer
        .identify_scale_degrees(Some(0), None, keys::SCALE_DEGREES)
        .unwrap();

    let findings = analyzer.results().get(keys::SCALE_DEGREES).unwrap();
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0].value, Value::Text("1".to_string()));
    // Foreign pitch still matches, with a "none" value
    assert_eq!(findings[1].value, Value::Text("none".to_string()));
    assert_eq!(findings[2].value, Value::Text("5".to_string()));
}

#[test]
fn test_rests_produce_no_scale_degree() {
    let mut score = Score::new();
    let mut p0 = Part::new();
    p0.append_note(pitch("c4"), ql(1), 1);
    p0.append_rest(ql(1), 1);
    p0.append_note(pitch("g4"), ql(1), 1);
    score.add_part(p0);
    let mut analyzer = Analyzer::new(score, TonalContext::new(Tonic::C, Mode::Major));

    analyzer
        .identify_scale_degrees(None, None, keys::SCALE_DEGREES)
        .unwrap();
    assert_eq!(analyzer.results().get(keys::SCALE_DEGREES).unwrap().len(), 2);
}

#[test]
fn test_slice_evaluator_covers_every_slice() {
    let mut score = Score::new();
    let mut p0 = Part::new();
    p0.append_note(pitch("c5"), ql(1), 1);
    p0.append_rest(ql(1), 1);
    p0.append_note(pitch("e5"), ql(1), 1);
    score.add_part(p0);
    score.add_part(make_part(&["c4", "d4", "e4"]));
    let mut analyzer = Analyzer::new(score, TonalContext::new(Tonic::C, Mode::Major));

    analyzer
        .evaluate_slices(
            "incomplete",
            None,
            |slice| RuleOutcome::from_bool(!slice.is_complete()),
            |slice| format!("incomplete simultaneity at {}", slice.onset()),
        )
        .unwrap();

    let findings = analyzer.results().get("incomplete").unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].text, "incomplete simultaneity at 1");
}

#[test]
fn test_motion_type_labels_every_transition() {
    let mut analyzer = analyzer_for(vec![
        vec!["c5", "d5", "d5"],
        vec!["c4", "b3", "b3"],
    ]);
    analyzer
        .identify_motion_type(Some((0, 1)), None, keys::MOTION_TYPE)
        .unwrap();

    let findings = analyzer.results().get(keys::MOTION_TYPE).unwrap();
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].value, Value::Text("Contrary".to_string()));
    assert_eq!(findings[1].value, Value::Text("No Motion".to_string()));
    assert_eq!(findings[1].text, "No motion");
}
