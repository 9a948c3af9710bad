//! Explicit dataset cache owned by the caller.
//!
//! Sources are treated as static for a session, so entries are never
//! invalidated. The key is the canonical source path; load options are not
//! part of the key.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{load, Dataset, SourceError, SourceOptions};

#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        options: &SourceOptions,
    ) -> Result<Arc<Dataset>, SourceError> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if let Some(hit) = self.entries.get(&key) {
            tracing::debug!(path = %key.display(), "source cache hit");
            return Ok(Arc::clone(hit));
        }

        let dataset = Arc::new(load(path, options)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
