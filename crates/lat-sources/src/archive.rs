//! Zip archive source — every `.csv` entry is read in archive order and the
//! records are concatenated into one dataset.

use std::path::Path;

use crate::{csv_file, Dataset, SourceError, SourceOptions};

/// Load all CSV entries of a zip archive.
pub fn load_archive(path: &Path, options: &SourceOptions) -> Result<Dataset, SourceError> {
    let zip_err = |source| SourceError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(zip_err)?;

    let mut dataset = Dataset::empty(path);
    let mut entries = 0usize;
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(zip_err)?;
        if !entry.is_file() || !entry.name().ends_with(".csv") {
            tracing::debug!(entry = entry.name(), "skipping non-csv archive entry");
            continue;
        }
        let origin = format!("{}!{}", path.display(), entry.name());
        csv_file::read_into(entry, &origin, options, &mut dataset)?;
        entries += 1;
    }

    tracing::info!(
        path = %path.display(),
        entries,
        records = dataset.records.len(),
        excluded = dataset.excluded,
        malformed = dataset.malformed,
        "loaded archive"
    );
    Ok(dataset)
}
