//! lat-sources — record source adapters for lat.
//!
//! Each source reads access-log exports from disk and produces an in-memory
//! [`Dataset`] of [`lat_core::RawRecord`]s. This is the only place in lat that
//! performs file I/O on log data; the core never sees an I/O error.

pub mod archive;
pub mod cache;
pub mod csv_file;
mod error;

use std::path::{Path, PathBuf};

use lat_core::RawRecord;

pub use archive::load_archive;
pub use cache::SourceCache;
pub use csv_file::load_csv;
pub use error::SourceError;

/// Messages containing this literal are dropped unless configured otherwise.
pub const DEFAULT_EXCLUDED_PATTERN: &str = "http://erp-sys-apigateway:8765/error";

/// Load-time options shared by all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// A record is dropped when its message contains any of these literals.
    pub exclude_message_patterns: Vec<String>,
}

impl SourceOptions {
    pub fn new(exclude_message_patterns: Vec<String>) -> Self {
        Self { exclude_message_patterns }
    }

    /// Options that keep every record.
    pub fn keep_all() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_excluded(&self, message: &str) -> bool {
        self.exclude_message_patterns
            .iter()
            .any(|p| !p.is_empty() && message.contains(p.as_str()))
    }
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self::new(vec![DEFAULT_EXCLUDED_PATTERN.to_string()])
    }
}

/// Records loaded from one source, plus load bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Path the records were loaded from.
    pub origin: PathBuf,
    pub records: Vec<RawRecord>,
    /// Rows dropped by the exclusion patterns.
    pub excluded: usize,
    /// Rows that could not be parsed.
    pub malformed: usize,
}

impl Dataset {
    pub fn empty(origin: &Path) -> Self {
        Self {
            origin: origin.to_path_buf(),
            records: Vec::new(),
            excluded: 0,
            malformed: 0,
        }
    }
}

/// Which loader handles a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Archive,
}

impl SourceKind {
    /// Detect the source kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(SourceKind::Csv),
            Some("zip") => Ok(SourceKind::Archive),
            _ => Err(SourceError::UnsupportedExtension(path.to_path_buf())),
        }
    }
}

/// Load `path` with the loader matching its extension.
pub fn load(path: &Path, options: &SourceOptions) -> Result<Dataset, SourceError> {
    match SourceKind::from_path(path)? {
        SourceKind::Csv => load_csv(path, options),
        SourceKind::Archive => load_archive(path, options),
    }
}
