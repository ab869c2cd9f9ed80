//! Tests for spread, gather, unite and separate.

use colframe::model::{ColumnKind, Value};
use colframe::select::except;
use colframe::{table_of, Frame, FrameError, Table};

fn long() -> Table {
    table_of!(
        "id", "key", "value";
        1, "a", 1.5,
        1, "b", 2.5,
        2, "a", 3.5,
        2, "b", 4.5,
    )
    .unwrap()
}

#[test]
fn test_spread_then_gather_round_trips() {
    let wide = long().spread("key", "value", false).unwrap();
    assert_eq!(wide.names(), vec!["id", "a", "b"]);
    assert_eq!(wide.nrow(), 2);

    let back = wide
        .gather_with("key", "value", &except(["id"]), false)
        .unwrap()
        .sort_by(["id", "key"])
        .unwrap();
    assert_eq!(back, long());
}

#[test]
fn test_spread_fills_missing_cells() {
    let sparse = table_of!("id", "key", "value"; 1, "a", 1, 2, "b", 2).unwrap();
    let wide = sparse.spread("key", "value", false).unwrap();
    assert_eq!(wide.column("a").unwrap().to_values(), vec![Value::Int(1), Value::Null]);
    assert_eq!(wide.column("b").unwrap().to_values(), vec![Value::Null, Value::Int(2)]);
}

#[test]
fn test_spread_convert_parses_text() {
    let t = table_of!("id", "key", "value"; 1, "n", "12", 1, "flag", "true").unwrap();
    let wide = t.spread("key", "value", true).unwrap();
    assert_eq!(wide.column("n").unwrap().kind(), ColumnKind::Int);
    assert_eq!(wide.column("flag").unwrap().kind(), ColumnKind::Bool);
}

#[test]
fn test_spread_errors() {
    assert_eq!(
        long().spread("nope", "value", false),
        Err(FrameError::ColumnNotFound("nope".to_string()))
    );
    let dup = table_of!("key", "value"; "a", 1, "a", 2).unwrap();
    assert!(matches!(dup.spread("key", "value", false), Err(FrameError::KeyNotUnique(_))));
}

#[test]
fn test_gather_convert_narrows_keys() {
    let wide = table_of!("id", "2014", "2015"; 1, 3.0, 4.0).unwrap();
    let tall = wide.gather("year", "weight", &["2014", "2015"], true).unwrap();
    assert_eq!(tall.column("year").unwrap().kind(), ColumnKind::Int);
    assert_eq!(tall.column("year").unwrap().get(1), Some(Value::Int(2015)));
}

#[test]
fn test_unite_and_separate_round_trip() {
    let t = table_of!("first", "last"; "Ada", "Lovelace", "Alan", "Turing").unwrap();
    let united = t.unite("full", &["first", "last"], " ", true).unwrap();
    assert_eq!(united.names(), vec!["full"]);
    assert_eq!(united.column("full").unwrap().get(1), Some("Alan Turing".into()));

    let split = united.separate("full", &["first", "last"], " ", true, false).unwrap();
    assert_eq!(split, t);
}
