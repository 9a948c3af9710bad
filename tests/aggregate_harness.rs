#![allow(unused)]
//! Aggregation integration harness — per-context latency statistics.
//!
//! # What this covers
//!
//! - **Exact values** for the documented examples (odd and even medians).
//! - **Grouping** by exact context string after projection.
//! - **Partitioned aggregation**: merging per-source aggregations gives the
//!   same result as aggregating the concatenated input.
//! - **Consistency**: `min <= mean, median <= max` for every group.
//!
//! # Running
//!
//! ```sh
//! cargo test --test aggregate_harness
//! ```

mod common;
use common::*;

use lat_core::{aggregate, Aggregation, NormalizedRecord, Projection};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn rec(context: &str, ms: Option<u64>) -> NormalizedRecord {
    NormalizedRecord {
        timestamp: String::new(),
        url: String::new(),
        context: context.to_string(),
        latency_ms: ms,
    }
}

#[test]
fn empty_input_has_no_groups() {
    assert!(aggregate(&[]).is_empty());
}

#[test]
fn odd_group() {
    let stats = aggregate(&[rec("/a", Some(10)), rec("/a", Some(20)), rec("/a", Some(30))]);
    assert_eq!(stats.len(), 1);
    assert_stats!(stats, "/a", count: 3, min: 10, max: 30, mean: 20.0, median: 20.0);
}

#[test]
fn even_group_median_is_midpoint() {
    let stats = aggregate(&[rec("/a", Some(10)), rec("/a", Some(20))]);
    assert_stats!(stats, "/a", count: 2, min: 10, max: 20, mean: 15.0, median: 15.0);
}

#[test]
fn projected_scenario() {
    let records = vec![timed_split("/foo/bar", 100), timed_split("/foo/baz", 300)];
    let stats = aggregate(&Projection::new(1).project_for_stats(&records));
    assert_stats!(stats, "/foo", count: 2, min: 100, max: 300, mean: 200.0, median: 200.0);
}

#[test]
fn depth_changes_grouping() {
    let records = vec![
        timed("http://gw/erp/orders/1", 10),
        timed("http://gw/erp/orders/2", 30),
        timed("http://gw/erp/items/1", 50),
    ];
    let shallow = aggregate(&Projection::new(0).project_for_stats(&records));
    assert_stats!(shallow, "erp", count: 3, min: 10, max: 50, mean: 30.0, median: 30.0);

    let deep = aggregate(&Projection::new(1).project_for_stats(&records));
    let contexts: Vec<_> = deep.keys().cloned().collect();
    assert_eq!(contexts, vec!["erp/items", "erp/orders"]);
    assert_stats!(deep, "erp/orders", count: 2, min: 10, max: 30, mean: 20.0, median: 20.0);
}

#[test]
fn absent_latency_is_not_counted() {
    let stats = aggregate(&[rec("/a", Some(7)), rec("/a", None), rec("/b", None)]);
    assert_stats!(stats, "/a", count: 1, min: 7, max: 7, mean: 7.0, median: 7.0);
    assert!(!stats.contains_key("/b"));
}

#[test]
fn contexts_are_compared_exactly() {
    let stats = aggregate(&[rec("/a", Some(1)), rec("/a/", Some(2)), rec("/A", Some(3))]);
    assert_eq!(stats.len(), 3);
}

#[test]
fn corpus_stats_are_consistent() {
    let records = build_corpus(500, &["erp", "crm", "hr", "fin"]);
    let stats = aggregate(&Projection::new(0).project_for_stats(&records));
    assert_eq!(stats.len(), 4);
    assert_eq!(stats.values().map(|s| s.count).sum::<usize>(), 500);
    assert_stats_consistent(stats.values());
}

#[test]
fn per_source_merge_matches_whole() {
    let left = build_corpus(40, &["erp", "crm"]);
    let right = build_corpus(25, &["crm", "hr"]);
    let projection = Projection::new(0);

    let mut merged = Aggregation::from_records(&projection.project_for_stats(&left));
    merged.merge(Aggregation::from_records(&projection.project_for_stats(&right)));

    let mut all = left.clone();
    all.extend(right);
    assert_eq!(merged.finish(), aggregate(&projection.project_for_stats(&all)));
}

proptest! {
    #[test]
    fn every_group_is_consistent(values in prop::collection::vec((0usize..4, 0u64..10_000), 1..200)) {
        let records: Vec<_> = values
            .iter()
            .map(|(ctx, ms)| rec(["/a", "/b", "/c", "/d"][*ctx], Some(*ms)))
            .collect();
        let stats = aggregate(&records);
        prop_assert_eq!(stats.values().map(|s| s.count).sum::<usize>(), records.len());
        assert_stats_consistent(stats.values());
    }
}
