//! Group matching for joins

use std::cmp::Ordering;

use crate::group::DataGroup;

/// Merge two key-sorted group lists.
///
/// Returns `(Option<left>, Option<right>)` pairs in key order; a side is
/// `None` when the key occurs only in the other list.
pub fn merge_groups<'a>(
    left: &'a [DataGroup],
    right: &'a [DataGroup],
) -> Vec<(Option<&'a DataGroup>, Option<&'a DataGroup>)> {
    let mut matches = Vec::with_capacity(left.len().max(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left[i].key().cmp(right[j].key()) {
            Ordering::Less => {
                matches.push((Some(&left[i]), None));
                i += 1;
            }
            Ordering::Greater => {
                matches.push((None, Some(&right[j])));
                j += 1;
            }
            Ordering::Equal => {
                matches.push((Some(&left[i]), Some(&right[j])));
                i += 1;
                j += 1;
            }
        }
    }

    matches.extend(left[i..].iter().map(|g| (Some(g), None)));
    matches.extend(right[j..].iter().map(|g| (None, Some(g))));
    matches
}
