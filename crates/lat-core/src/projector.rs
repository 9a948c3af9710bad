//! Projector — turns [`RawRecord`]s into [`NormalizedRecord`]s.
//!
//! Projection resolves each record's URL (its own field, or the first
//! `http://` URL embedded in the message), applies the optional filters,
//! and derives the context and latency. Input order is preserved.
//!
//! Projection does not report suspicious input; callers run [`diagnose`]
//! once per loaded batch.
//!
//! [`Projection::project`] keeps every admitted record, which is what a
//! listing wants. [`Projection::project_for_stats`] additionally drops records
//! without a latency so that aggregation only ever sees valid numbers.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    context::{derive_context, in_context},
    latency::extract_latency,
    types::{NormalizedRecord, RawRecord},
};

static EMBEDDED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http://[^ ,]+").expect("embedded URL pattern is valid"));

/// Find the first `http://` URL inside a message, without trailing commas.
pub fn extract_embedded_url(message: &str) -> Option<String> {
    EMBEDDED_URL
        .find(message)
        .map(|m| m.as_str().trim_end_matches(',').to_string())
}

impl RawRecord {
    /// The URL this record refers to: its own field, else the embedded one.
    pub fn resolve_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| extract_embedded_url(&self.message))
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Projection parameters: context depth plus the optional filters. An
/// empty filter string is the same as no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub depth: usize,
    /// The URL path must lie under this application context (see
    /// [`in_context`]). The host is never compared.
    pub context: Option<String>,
    /// Literal, case-sensitive substring the resolved URL must contain.
    pub url_contains: Option<String>,
    /// Resolved URL must equal this exactly.
    pub exact_url: Option<String>,
}

impl Projection {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn url_contains(mut self, needle: impl Into<String>) -> Self {
        self.url_contains = Some(needle.into());
        self
    }

    pub fn exact_url(mut self, url: impl Into<String>) -> Self {
        self.exact_url = Some(url.into());
        self
    }

    /// Project every admitted record, latency present or not.
    pub fn project(&self, records: &[RawRecord]) -> Vec<NormalizedRecord> {
        let projected: Vec<NormalizedRecord> =
            records.iter().filter_map(|r| self.project_one(r)).collect();

        tracing::debug!(
            depth = self.depth,
            context = ?self.context,
            url_contains = ?self.url_contains,
            exact_url = ?self.exact_url,
            input = records.len(),
            output = projected.len(),
            "projected records"
        );
        projected
    }

    /// Project for aggregation: records without a latency are dropped.
    pub fn project_for_stats(&self, records: &[RawRecord]) -> Vec<NormalizedRecord> {
        self.project(records)
            .into_iter()
            .filter(|r| r.latency_ms.is_some())
            .collect()
    }

    fn project_one(&self, record: &RawRecord) -> Option<NormalizedRecord> {
        let url = record.resolve_url();

        if let Some(context) = active_filter(&self.context) {
            if !url.as_deref().is_some_and(|u| in_context(u, context)) {
                return None;
            }
        }
        if let Some(needle) = active_filter(&self.url_contains) {
            if !url.as_deref().is_some_and(|u| u.contains(needle)) {
                return None;
            }
        }
        if let Some(exact) = active_filter(&self.exact_url) {
            if url.as_deref() != Some(exact) {
                return None;
            }
        }

        let url = url.unwrap_or_default();

        Some(NormalizedRecord {
            timestamp: record.timestamp.clone(),
            context: derive_context(&url, self.depth),
            latency_ms: extract_latency(&record.message),
            url,
        })
    }
}

fn active_filter(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|f| !f.is_empty())
}

/// Project `records` at `depth` with the given optional filters.
pub fn project(
    records: &[RawRecord],
    depth: usize,
    url_contains: Option<&str>,
    exact_url: Option<&str>,
) -> Vec<NormalizedRecord> {
    Projection {
        depth,
        context: None,
        url_contains: url_contains.map(str::to_string),
        exact_url: exact_url.map(str::to_string),
    }
    .project(records)
}

// ---------------------------------------------------------------------------
// Input diagnostics
// ---------------------------------------------------------------------------

/// A soft warning about the shape of an input batch. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputWarning {
    /// No record carries a URL field or an embedded `http://` URL.
    NoUrls,
    /// No record contains a latency value.
    NoLatency,
}

impl std::fmt::Display for InputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputWarning::NoUrls => write!(f, "no record contains a resolvable URL"),
            InputWarning::NoLatency => write!(f, "no record contains a latency value"),
        }
    }
}

/// Report when a non-empty batch is missing a required field in every record.
pub fn diagnose(records: &[RawRecord]) -> Option<InputWarning> {
    if records.is_empty() {
        return None;
    }
    if records.iter().all(|r| r.resolve_url().is_none()) {
        return Some(InputWarning::NoUrls);
    }
    if records
        .iter()
        .all(|r| extract_latency(&r.message).is_none())
    {
        return Some(InputWarning::NoLatency);
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
