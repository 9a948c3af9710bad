//! Domain-specific assertion macros for lat harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! context or record broke the expectation.

use lat_core::{ContextStats, NormalizedRecord};

/// Assert the full statistics of one context.
///
/// ```rust
/// assert_stats!(stats, "/foo", count: 2, min: 100, max: 300, mean: 200.0, median: 200.0);
/// ```
#[macro_export]
macro_rules! assert_stats {
    ($stats:expr, $ctx:expr, count: $count:expr, min: $min:expr, max: $max:expr, mean: $mean:expr, median: $median:expr) => {{
        let stats: &std::collections::BTreeMap<String, lat_core::ContextStats> = &$stats;
        let ctx: &str = $ctx;
        match stats.get(ctx) {
            Some(actual) => pretty_assertions::assert_eq!(
                actual,
                &lat_core::ContextStats {
                    context: ctx.to_string(),
                    count: $count,
                    min: $min,
                    max: $max,
                    mean: $mean,
                    median: $median,
                },
                "statistics for context {:?}",
                ctx
            ),
            None => panic!(
                "assert_stats! failed: no context {:?}.\n  Available: {:?}",
                ctx,
                stats.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert the exact, ordered list of contexts a projection produced.
#[macro_export]
macro_rules! assert_contexts {
    ($records:expr, [$($ctx:expr),* $(,)?]) => {{
        let records: &[lat_core::NormalizedRecord] = &$records;
        let actual: Vec<&str> = records.iter().map(|r| r.context.as_str()).collect();
        let expected: Vec<&str> = vec![$($ctx),*];
        pretty_assertions::assert_eq!(actual, expected, "projected contexts");
    }};
}

/// Every record's resolved URL contains `needle`.
pub fn assert_all_urls_contain(records: &[NormalizedRecord], needle: &str) {
    for r in records {
        assert!(
            r.url.contains(needle),
            "record {:?} has url {:?} without {:?}",
            r.timestamp,
            r.url,
            needle
        );
    }
}

/// `min <= median <= max` and `min <= mean <= max` for every context.
pub fn assert_stats_consistent<'a>(stats: impl IntoIterator<Item = &'a ContextStats>) {
    for s in stats {
        assert!(s.count > 0, "{}: empty group reported", s.context);
        assert!(s.min <= s.max, "{}: min > max", s.context);
        for (name, v) in [("mean", s.mean), ("median", s.median)] {
            assert!(
                s.min as f64 <= v && v <= s.max as f64,
                "{}: {name} {v} outside [{}, {}]",
                s.context,
                s.min,
                s.max
            );
        }
    }
}
