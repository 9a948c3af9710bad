//! Aggregator — groups projected records by context and summarises latency.
//!
//! Aggregation is split into two phases so that disjoint partitions of a
//! dataset can be accumulated separately and combined afterwards:
//!
//! 1. [`ContextSamples`] collects every latency value of one context.
//!    Partial accumulators combine with [`ContextSamples::merge`].
//! 2. [`ContextSamples::finish`] computes the summary. The median is only
//!    ever computed here, over the complete merged value set.

use std::collections::BTreeMap;

use crate::types::{ContextStats, NormalizedRecord};

// ---------------------------------------------------------------------------
// Per-context accumulator
// ---------------------------------------------------------------------------

/// All latency values observed for one context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSamples {
    values: Vec<u64>,
    min: Option<u64>,
    max: Option<u64>,
    sum: u128,
}

impl ContextSamples {
    pub fn push(&mut self, value: u64) {
        self.values.push(value);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        self.sum += u128::from(value);
    }

    /// Absorb another accumulator for the same context.
    pub fn merge(&mut self, other: ContextSamples) {
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.sum += other.sum;
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Summarise the collected values. `None` when nothing was collected.
    pub fn finish(mut self, context: impl Into<String>) -> Option<ContextStats> {
        let (min, max) = (self.min?, self.max?);
        let count = self.values.len();
        let mean = self.sum as f64 / count as f64;
        let median = median(&mut self.values)?;
        Some(ContextStats {
            context: context.into(),
            count,
            min,
            max,
            mean,
            median,
        })
    }
}

/// Median of `values`; sorts the slice in place. `None` for an empty slice.
pub fn median(values: &mut [u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 1 {
        values[mid] as f64
    } else {
        (values[mid - 1] as f64 + values[mid] as f64) / 2.0
    };
    Some(median)
}

// ---------------------------------------------------------------------------
// Whole-dataset accumulator
// ---------------------------------------------------------------------------

/// Per-context accumulators for a set of records.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    groups: BTreeMap<String, ContextSamples>,
}

impl Aggregation {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a NormalizedRecord>) -> Self {
        let mut aggregation = Self::default();
        aggregation.extend(records);
        aggregation
    }

    /// Add records; those without a latency are skipped.
    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a NormalizedRecord>) {
        for record in records {
            if let Some(ms) = record.latency_ms {
                self.groups
                    .entry(record.context.clone())
                    .or_default()
                    .push(ms);
            }
        }
    }

    /// Combine with the aggregation of a disjoint partition.
    pub fn merge(&mut self, other: Aggregation) {
        for (context, samples) in other.groups {
            self.groups.entry(context).or_default().merge(samples);
        }
    }

    pub fn finish(self) -> BTreeMap<String, ContextStats> {
        self.groups
            .into_iter()
            .filter_map(|(context, samples)| {
                let stats = samples.finish(context.as_str())?;
                Some((context, stats))
            })
            .collect()
    }
}

/// Group records by context and compute latency statistics per group.
///
/// Records without a latency are ignored; a context with no remaining records
/// does not appear in the result.
pub fn aggregate(records: &[NormalizedRecord]) -> BTreeMap<String, ContextStats> {
    let stats = Aggregation::from_records(records).finish();
    tracing::debug!(records = records.len(), groups = stats.len(), "aggregated");
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
