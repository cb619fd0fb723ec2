//! Shared grouping and windowing helpers
//!
//! Keys are kept in a `BTreeMap` so per-IP findings come out in IP order
//! regardless of how the input was ordered.

use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;

/// Partition `(ip, value)` pairs by IP, keeping each IP's values in input order
pub fn group_by_ip<'a, T>(pairs: impl IntoIterator<Item = (&'a str, T)>) -> BTreeMap<&'a str, Vec<T>> {
    let mut groups: BTreeMap<&'a str, Vec<T>> = BTreeMap::new();
    for (ip, value) in pairs {
        groups.entry(ip).or_default().push(value);
    }
    groups
}

/// True if any `run_len` consecutive entries of `sorted` span at most `limit`.
///
/// The bound is inclusive: a span exactly equal to `limit` counts.
pub fn has_dense_run(sorted: &[NaiveDateTime], run_len: usize, limit: Duration) -> bool {
    if run_len == 0 {
        return false;
    }
    sorted
        .windows(run_len)
        .any(|run| run[run_len - 1] - run[0] <= limit)
}
