//! lat-core — Log Analysis Tool core library.
//!
//! This crate holds the extraction-and-aggregation pipeline plus the shared
//! record types. Everything here is pure and synchronous: callers hand in an
//! in-memory slice of records and get derived records or statistics back.
//!
//! # Architecture
//!
//! ```text
//! RawRecord ──► Projection ──► aggregate ──► ContextStats
//!                 │  │              │
//!   derive_context┘  └extract_latency
//!                 │                 │
//!                 └────────┬────────┘
//!                          ▼
//!                       export
//! ```

pub mod aggregate;
pub mod config;
pub mod context;
pub mod discovery;
pub mod export;
pub mod latency;
pub mod projector;
pub mod types;

pub use aggregate::{aggregate, Aggregation, ContextSamples};
pub use context::{derive_context, derive_context_with, in_context, ContextVariant};
pub use discovery::{root_contexts, urls_for_context};
pub use export::{export, export_csv, export_jsonl, CsvRow, ExportError, ExportFormat};
pub use latency::{extract_latency, LATENCY_MARKER};
pub use projector::{diagnose, extract_embedded_url, project, InputWarning, Projection};
pub use types::{ContextStats, NormalizedRecord, RawRecord, CONTEXT_NOT_FOUND};
