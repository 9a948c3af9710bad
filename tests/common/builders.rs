//! Test builders — ergonomic constructors for `RawRecord` fixtures.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use lat_core::{RawRecord, LATENCY_MARKER};

// ---------------------------------------------------------------------------
// RawRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawRecord`] test fixtures.
///
/// # Example
///
/// ```rust
/// let record = RawRecordBuilder::new("http://gw:8765/erp/orders")
///     .latency(120)
///     .ts("2024-01-15T10:00:00Z")
///     .build();
/// ```
pub struct RawRecordBuilder {
    ts: String,
    url: String,
    latency: Option<u64>,
    split: bool,
    extra: String,
}

impl RawRecordBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            ts: "2024-01-15T10:00:00Z".to_string(),
            url: url.into(),
            latency: None,
            split: false,
            extra: String::new(),
        }
    }

    pub fn ts(mut self, ts: impl Into<String>) -> Self {
        self.ts = ts.into();
        self
    }

    pub fn latency(mut self, ms: u64) -> Self {
        self.latency = Some(ms);
        self
    }

    /// Put the URL in its own field instead of inside the message.
    pub fn split(mut self) -> Self {
        self.split = true;
        self
    }

    /// Free text appended to the message.
    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.extra = text.into();
        self
    }

    fn timing(&self) -> String {
        match self.latency {
            Some(ms) => format!("{LATENCY_MARKER}{ms}"),
            None => "no timing recorded".to_string(),
        }
    }

    pub fn build(self) -> RawRecord {
        let timing = self.timing();
        let mut message = if self.split {
            timing
        } else {
            format!("GET {}, {timing}", self.url)
        };
        if !self.extra.is_empty() {
            message.push(' ');
            message.push_str(&self.extra);
        }
        if self.split {
            RawRecord::split(self.ts, self.url, message)
        } else {
            RawRecord::embedded(self.ts, message)
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Embedded-URL record with a latency.
pub fn timed(url: &str, ms: u64) -> RawRecord {
    RawRecordBuilder::new(url).latency(ms).build()
}

/// Pre-split record with a latency.
pub fn timed_split(url: &str, ms: u64) -> RawRecord {
    RawRecordBuilder::new(url).latency(ms).split().build()
}

/// Embedded-URL record with no latency marker.
pub fn untimed(url: &str) -> RawRecord {
    RawRecordBuilder::new(url).build()
}

/// Build `n` records spread over `contexts`, latencies `0..n`.
pub fn build_corpus(n: usize, contexts: &[&str]) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let ctx = contexts[i % contexts.len()];
            RawRecordBuilder::new(format!("http://gw:8765/{ctx}/item/{i}"))
                .latency(i as u64)
                .ts(format!("t{i}"))
                .build()
        })
        .collect()
}
