//! Tests for the join engine.

use colframe::model::{Column, Value};
use colframe::{table_of, Frame, JoinOptions, JoinType, Table};

fn left() -> Table {
    table_of!("id", "v"; 1, "a", 2, "b", 3, "c").unwrap()
}

fn right() -> Table {
    table_of!("id", "v"; 2, "B", 3, "C", 4, "D").unwrap()
}

#[test]
fn test_left_join_suffixes_shared_columns() {
    let joined = left().left_join(&right(), &["id"]).unwrap();
    assert_eq!(joined.names(), vec!["id", "v.x", "v.y"]);
    assert_eq!(joined.nrow(), 3);
    assert_eq!(
        joined.column("v.y").unwrap().to_values(),
        vec![Value::Null, "B".into(), "C".into()]
    );
}

#[test]
fn test_join_kinds() {
    assert_eq!(left().inner_join(&right(), &["id"]).unwrap().nrow(), 2);
    assert_eq!(left().right_join(&right(), &["id"]).unwrap().nrow(), 3);

    let outer = left().outer_join(&right(), &["id"]).unwrap();
    assert_eq!(outer.nrow(), 4);
    assert_eq!(
        outer.column("id").unwrap().to_values(),
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
    );
    assert_eq!(outer.column("v.x").unwrap().get(3), Some(Value::Null));
}

#[test]
fn test_custom_suffixes_and_pairs() {
    let other = table_of!("key", "v"; 1, "z").unwrap();
    let options = JoinOptions::new()
        .with_by_pairs([("id", "key")])
        .with_suffixes("_left", "_right");
    let joined = left().join(&other, JoinType::Inner, &options).unwrap();
    assert_eq!(joined.names(), vec!["id", "v_left", "v_right"]);
    assert_eq!(joined.nrow(), 1);
}

#[test]
fn test_no_matches_give_empty_result() {
    let other = table_of!("id", "w"; 9, true).unwrap();
    for joined in [
        left().inner_join(&other, &["id"]).unwrap(),
        other.inner_join(&left(), &["id"]).unwrap(),
    ] {
        assert_eq!(joined.nrow(), 0);
        assert_eq!(joined.ncol(), 3);
    }
}

#[test]
fn test_empty_left_side() {
    let empty = Table::new(vec![
        Column::ints("id", Vec::<i32>::new()),
        Column::strings("w", Vec::<String>::new()),
    ])
    .unwrap();

    let left_joined = empty.left_join(&right(), &["id"]).unwrap();
    assert_eq!(left_joined.nrow(), 0);
    assert_eq!(left_joined.names(), vec!["id", "w", "v"]);

    let outer = empty.outer_join(&right(), &["id"]).unwrap();
    assert_eq!(outer.nrow(), 3);
    assert_eq!(outer.column("w").unwrap().get(0), Some(Value::Null));
    assert_eq!(outer.column("id").unwrap().get(2), Some(Value::Int(4)));
}

#[test]
fn test_cross_join_order() {
    let a = table_of!("a"; 1, 2).unwrap();
    let b = table_of!("b"; "x", "y").unwrap();
    let cross = a.cross_join(&b).unwrap();
    assert_eq!(cross.nrow(), 4);
    assert_eq!(
        cross.column("a").unwrap().to_values(),
        vec![Value::Int(1), Value::Int(2), Value::Int(1), Value::Int(2)]
    );
    assert_eq!(
        cross.column("b").unwrap().to_values(),
        vec!["x".into(), "x".into(), "y".into(), "y".into()]
    );
}

#[test]
fn test_self_join_on_all_columns_keeps_rows() {
    let t = left();
    let joined = t.inner_join(&t, &t.names()).unwrap();
    assert_eq!(joined.nrow(), t.nrow());
}

#[test]
fn test_null_keys_match_each_other() {
    let a = table_of!("k", "x"; Value::Null, 1).unwrap();
    let b = table_of!("k", "y"; Value::Null, 2).unwrap();
    assert_eq!(a.inner_join(&b, &["k"]).unwrap().nrow(), 1);
}

#[test]
fn test_numeric_keys_of_different_kinds() {
    let a = table_of!("k", "x"; 1, "a").unwrap();
    let b = table_of!("k", "y"; 1i64, "b").unwrap();
    assert_eq!(a.inner_join(&b, &["k"]).unwrap().nrow(), 1);
}

#[test]
fn test_semi_join_and_default_by() {
    let semi = left().semi_join(&right(), &["id"]).unwrap();
    assert_eq!(semi.names(), vec!["id", "v"]);
    assert_eq!(semi.nrow(), 2);

    let other = table_of!("id", "w"; 3, 0.5).unwrap();
    let joined = left().natural_join(&other, JoinType::Left).unwrap();
    assert_eq!(joined.names(), vec!["id", "v", "w"]);
}

#[test]
fn test_empty_by_is_cross_product() {
    let a = table_of!("foo", "bar"; "a", 2, "b", 3, "c", 4).unwrap();
    let joined = a.outer_join::<&str>(&a, &[]).unwrap();
    assert_eq!(joined.nrow(), 9);
    assert_eq!(joined.names(), vec!["foo.x", "bar.x", "foo.y", "bar.y"]);

    assert_eq!(a.semi_join::<&str>(&a, &[]).unwrap(), a);
    assert_eq!(a.semi_join::<&str>(&a.head(0).unwrap(), &[]).unwrap().nrow(), 0);
}

#[test]
fn test_null_key_groups_come_last() {
    let a = table_of!("k", "x"; Value::Null, "n", 2, "b", 1, "a").unwrap();
    let b = table_of!("k", "y"; 3, true, Value::Null, false).unwrap();
    let joined = a.outer_join(&b, &["k"]).unwrap();
    assert_eq!(
        joined.column("k").unwrap().to_values(),
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Null]
    );
    assert_eq!(
        joined.column("x").unwrap().to_values(),
        vec!["a".into(), "b".into(), Value::Null, "n".into()]
    );
}
