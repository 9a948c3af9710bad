//! Core types for lat-core — Log Analysis Tool.
//!
//! This module defines the records that flow through the pipeline: the
//! ingested [`RawRecord`], the derived [`NormalizedRecord`], and the per-group
//! [`ContextStats`].

use serde::Serialize;

/// Context value used when no application context could be derived from a URL.
pub const CONTEXT_NOT_FOUND: &str = "App Context Not found";

/// One access-log line as supplied by a record source.
///
/// The URL is either supplied as its own field (pre-split sources) or left as
/// `None`, in which case it is located inside `message` during projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    /// Opaque timestamp, passed through unmodified.
    pub timestamp: String,
    /// URL field of pre-split sources.
    pub url: Option<String>,
    /// Free-text log message.
    pub message: String,
}

impl RawRecord {
    /// A record whose URL was supplied as a separate field.
    pub fn split(
        timestamp: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            url: Some(url.into()),
            message: message.into(),
        }
    }

    /// A record whose URL is embedded somewhere inside the message text.
    pub fn embedded(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            url: None,
            message: message.into(),
        }
    }
}

/// The canonical unit produced by projection. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub timestamp: String,
    /// Resolved URL; empty when the record carried none.
    pub url: String,
    /// Derived application context, or [`CONTEXT_NOT_FOUND`].
    pub context: String,
    /// Latency in milliseconds, `None` when extraction failed.
    pub latency_ms: Option<u64>,
}

impl NormalizedRecord {
    /// True when a real context (not the sentinel) was derived.
    pub fn has_context(&self) -> bool {
        self.context != CONTEXT_NOT_FOUND
    }
}

/// Latency summary over every record sharing one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextStats {
    pub context: String,
    pub count: usize,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
}
