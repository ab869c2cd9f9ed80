//! Tests for column selectors on tables.

use colframe::model::ColumnKind;
use colframe::select::{ends_with, everything, except, matches, of_kind, range, starts_with};
use colframe::{table_of, Frame, FrameError, Table};

fn iris() -> Table {
    table_of!(
        "Sepal.Length", "Sepal.Width", "Petal.Length", "Petal.Width", "Species";
        5.1, 3.5, 1.4, 0.2, "setosa",
        7.0, 3.2, 4.7, 1.4, "versicolor",
    )
    .unwrap()
}

#[test]
fn test_positive_selection() {
    let t = iris();
    assert_eq!(
        t.select_with(&(starts_with("Petal") & ends_with("Width"))).unwrap().names(),
        vec!["Petal.Width"]
    );
    assert_eq!(
        t.select_with(&range("Sepal.Width", "Petal.Length")).unwrap().names(),
        vec!["Sepal.Width", "Petal.Length"]
    );
    assert_eq!(t.select_with(&of_kind(ColumnKind::Str)).unwrap().names(), vec!["Species"]);
    assert_eq!(t.select_with(&everything()).unwrap(), t);
    assert_eq!(
        t.select_with(&matches("Sepal\\..*").unwrap()).unwrap().ncol(),
        2
    );
}

#[test]
fn test_negative_selection() {
    let t = iris();
    assert_eq!(
        t.select_with(&(!starts_with("Sepal") & except(["Species"])))
            .unwrap()
            .names(),
        vec!["Petal.Length", "Petal.Width"]
    );
    assert_eq!(
        t.remove_with(&ends_with("Length")).unwrap().names(),
        vec!["Sepal.Width", "Petal.Width", "Species"]
    );
}

#[test]
fn test_mixed_selection_error_message() {
    let err = iris()
        .select_with(&(starts_with("Sepal") & except(["Species"])))
        .unwrap_err();
    assert!(matches!(err, FrameError::InvalidColumnSelect(_)));
    let message = err.to_string();
    assert!(message.starts_with("Mixing positive and negative selection"));
    assert!(message.ends_with(
        "+Sepal.Length,+Sepal.Width,-Petal.Length,-Petal.Width,-Species"
    ));
}
