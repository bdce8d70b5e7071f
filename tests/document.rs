//! Tests for the document API: numbering resolution, lookup and the
//! procedural builder

use tap::{parse_string, DocumentBuilder, Mode, TapError};

#[test]
fn test_enumeration_fills_gaps_between_declared_numbers() {
    let source = "1..8\nok 1\nok 3\nok\nok 8\n";
    let doc = parse_string(source, Mode::Lenient).unwrap();
    assert_eq!(doc.enumeration().unwrap(), vec![1, 3, 4, 8]);
    // holes make the document invalid, but enumeration itself works
    assert!(!doc.valid().unwrap());
}

#[test]
fn test_enumeration_keeps_out_of_order_numbers() {
    let source = "1..4\nok 1\nok 3\nok\nok 2\n";
    let doc = parse_string(source, Mode::Lenient).unwrap();
    assert_eq!(doc.enumeration().unwrap(), vec![1, 3, 4, 2]);
    assert!(doc.valid().unwrap());
}

#[test]
fn test_lookup_by_resolved_number() {
    let source = "1..3\nok 2 - second\nok - becomes third\nnot ok 1 - was last\n";
    let doc = parse_string(source, Mode::Lenient).unwrap();

    assert_eq!(doc.get(2).unwrap().unwrap().description, "second");
    let third = doc.get(3).unwrap().unwrap();
    assert_eq!(third.description, "becomes third");
    assert_eq!(third.number, Some(3));
    assert_eq!(doc.get(1).unwrap().unwrap().description, "was last");

    assert!(matches!(doc.get(4), Err(TapError::InvalidNumbering(_))));
}

#[test]
fn test_lookup_does_not_mutate_declared_numbers() {
    let source = "1..2\nok - a\nok - b\n";
    let doc = parse_string(source, Mode::Lenient).unwrap();
    let _ = doc.get(1).unwrap();
    let numbers: Vec<Option<u64>> = doc.testcases().map(|tc| tc.number).collect();
    assert_eq!(numbers, vec![None, None]);
}

#[test]
fn test_too_small_plan_is_invalid_not_fatal() {
    let source = "1..1\nok 1\nok 2\n";
    let doc = parse_string(source, Mode::Lenient).unwrap();
    assert!(matches!(
        doc.enumeration(),
        Err(TapError::InvalidNumbering(_))
    ));
    assert!(!doc.valid().unwrap());
}

#[test]
fn test_builder_produces_parseable_output() {
    let doc = DocumentBuilder::new()
        .version(13)
        .comment("# integration suite")
        .plan(1, 3)
        .unwrap()
        .ok("connect")
        .ok("query")
        .comment("took 12ms")
        .not_ok("teardown")
        .todo("close the pool")
        .finish();

    let text = doc.to_string();
    let reparsed = parse_string(&text, Mode::Lenient).unwrap();
    assert_eq!(reparsed.actual_length(), 3);
    assert_eq!(reparsed.count_todo(), 1);
    assert_eq!(reparsed.header(), "# integration suite\n");
    assert_eq!(
        reparsed.valid().unwrap(),
        doc.valid().unwrap()
    );
}

#[test]
fn test_builder_bailout_document() {
    let doc = DocumentBuilder::new()
        .plan_tests(2)
        .unwrap()
        .ok("boot")
        .bailout("kernel panic")
        .finish();

    let reparsed = parse_string(&doc.to_string(), Mode::Lenient).unwrap();
    assert!(reparsed.bailed());
    assert_eq!(reparsed.bailout_message(), Some("kernel panic"));
    assert!(!reparsed.valid().unwrap());
}

#[test]
fn test_document_state_survives_json() {
    let doc = parse_string(
        "TAP version 13\n1..2\nok 1 - kept\nnot ok 2 # SKIP later\n",
        Mode::Lenient,
    )
    .unwrap();
    let state = serde_json::to_string(&doc).unwrap();
    let restored: tap::Document = serde_json::from_str(&state).unwrap();
    assert_eq!(restored, doc);
    assert_eq!(restored.to_string(), doc.to_string());
}
