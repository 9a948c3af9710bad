//! Static access-log corpora and fixture-file helpers used across harnesses.
//!
//! The CSV corpora mirror the two export shapes lat reads: one with a
//! separate `url` column, one with the URL embedded in `message`.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Export with the URL in its own column.
pub const CSV_SPLIT: &str = "\
@timestamp,url,message
2024-01-15T10:00:00Z,/foo/bar,Time Taken in ms= 100
2024-01-15T10:00:01Z,/foo/baz,Time Taken in ms= 300
2024-01-15T10:00:02Z,/hr/people,Time Taken in ms= 40
2024-01-15T10:00:03Z,/hr/people,cache warmup
";

/// Export with the URL embedded in the message.
pub const CSV_EMBEDDED: &str = "\
@timestamp,message
2024-01-15T10:00:00Z,\"GET http://erp-sys-apigateway:8765/erp/orders/1, Time Taken in ms= 120\"
2024-01-15T10:00:01Z,\"GET http://erp-sys-apigateway:8765/erp/orders/2, Time Taken in ms= 80\"
2024-01-15T10:00:02Z,\"GET http://erp-sys-apigateway:8765/crm/leads, Time Taken in ms= 45\"
2024-01-15T10:00:03Z,\"GET http://erp-sys-apigateway:8765/error, Time Taken in ms= 1\"
2024-01-15T10:00:04Z,heartbeat
";

/// Rows of [`CSV_EMBEDDED`] that survive the default exclusion pattern.
pub const CSV_EMBEDDED_KEPT: usize = 4;

/// Write `contents` to `dir/name` and return the path.
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture csv");
    path
}

/// Write a zip archive at `dir/name` holding `entries` (name, contents) in
/// order, deflate-compressed.
pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    use zip::write::SimpleFileOptions;

    let path = dir.join(name);
    let file = std::fs::File::create(&path).expect("create fixture zip");
    let mut zip = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (entry, contents) in entries {
        zip.start_file(*entry, options).expect("start zip entry");
        zip.write_all(contents.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish fixture zip");
    path
}
