//! CSV record reader shared by the single-file and archive sources.
//!
//! Expected columns are `@timestamp`, `message` and, for pre-split exports,
//! `url`. Missing columns read as empty; extra columns are ignored.

use std::{io::Read, path::Path};

use lat_core::RawRecord;
use serde::Deserialize;

use crate::{Dataset, SourceError, SourceOptions};

#[derive(Debug, Deserialize)]
struct CsvLine {
    #[serde(rename = "@timestamp", default)]
    timestamp: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl CsvLine {
    fn into_record(self) -> RawRecord {
        let timestamp = self.timestamp.unwrap_or_default();
        let message = self.message.unwrap_or_default();
        match self.url {
            Some(url) => RawRecord::split(timestamp, url, message),
            None => RawRecord::embedded(timestamp, message),
        }
    }
}

/// Read every record from `reader` into `dataset`, dropping excluded messages.
///
/// Rows that fail to parse are skipped with a warning; only I/O failures abort.
pub(crate) fn read_into<R: Read>(
    reader: R,
    origin: &str,
    options: &SourceOptions,
    dataset: &mut Dataset,
) -> Result<(), SourceError> {
    let mut table = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    for (row, line) in table.deserialize::<CsvLine>().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.is_io_error() => {
                return Err(SourceError::Csv { origin: origin.to_string(), source: e })
            }
            Err(e) => {
                tracing::warn!(origin, row, error = %e, "skipping malformed csv row");
                dataset.malformed += 1;
                continue;
            }
        };

        let record = line.into_record();
        if options.is_excluded(&record.message) {
            dataset.excluded += 1;
            continue;
        }
        dataset.records.push(record);
    }
    Ok(())
}

/// Load a single CSV file.
pub fn load_csv(path: &Path, options: &SourceOptions) -> Result<Dataset, SourceError> {
    let file = std::fs::File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut dataset = Dataset::empty(path);
    read_into(file, &path.display().to_string(), options, &mut dataset)?;

    tracing::info!(
        path = %path.display(),
        records = dataset.records.len(),
        excluded = dataset.excluded,
        malformed = dataset.malformed,
        "loaded csv"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(text: &str, options: &SourceOptions) -> Dataset {
        let mut dataset = Dataset::empty(Path::new("inline.csv"));
        read_into(text.as_bytes(), "inline.csv", options, &mut dataset).unwrap();
        dataset
    }

    #[test]
    fn pre_split_rows_keep_url_field() {
        let ds = read(
            "@timestamp,url,message\nt1,/foo/bar,Time Taken in ms= 100\n",
            &SourceOptions::default(),
        );
        assert_eq!(
            ds.records,
            vec![RawRecord::split("t1", "/foo/bar", "Time Taken in ms= 100")]
        );
    }

    #[test]
    fn message_only_rows_are_embedded() {
        let ds = read(
            "@timestamp,message\nt1,\"GET http://gw/erp/x, Time Taken in ms= 5\"\n",
            &SourceOptions::default(),
        );
        assert_eq!(ds.records[0].url, None);
        assert_eq!(ds.records[0].message, "GET http://gw/erp/x, Time Taken in ms= 5");
    }

    #[test]
    fn excluded_messages_are_dropped() {
        let options = SourceOptions::new(vec!["http://gw/error".to_string()]);
        let ds = read(
            "@timestamp,message\nt1,GET http://gw/error\nt2,GET http://gw/ok\n",
            &options,
        );
        assert_eq!(ds.records.len(), 1);
        assert_eq!(ds.records[0].timestamp, "t2");
        assert_eq!(ds.excluded, 1);
    }

    #[test]
    fn empty_url_cell_reads_as_missing() {
        let ds = read("@timestamp,url,message\nt1,,hello\n", &SourceOptions::default());
        assert_eq!(ds.records[0].url, None);
    }

    #[test]
    fn header_only_file_is_empty() {
        let ds = read("@timestamp,url,message\n", &SourceOptions::default());
        assert!(ds.records.is_empty());
    }
}
