//! lat — Log Analysis Tool
//!
//! Latency triage for HTTP access-log exports: every record is reduced to an
//! application context (a depth-bounded prefix of its URL) and a response
//! time, and the response times are summarised per context. This crate
//! re-exports the three layers so integration tests and benches can import
//! them from one place.
//!
//! # Architecture
//!
//! ```text
//! sources ──► core (project ──► aggregate) ──► tui / headless export
//! ```
//!
//! Everything runs on the main thread. The only I/O happens in `sources`
//! (reading CSV files and zip archives) and at the edges (export files,
//! stdout in headless mode).

pub use lat_core as core;
pub use lat_sources as sources;
pub use lat_tui as tui;
