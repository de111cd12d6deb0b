//! JSON reading and writing of annotation record lists.
//!
//! The record list is the only exchange format: a JSON array of records in
//! the export shape described on [`AnnotationRecord`].

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::record::{AnnotationRecord, RecordInput};
use crate::error::AnnorectError;

/// Reads a list of complete records from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_records_json(path: &Path) -> Result<Vec<AnnotationRecord>, AnnorectError> {
    let file = File::open(path).map_err(AnnorectError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| AnnorectError::RecordsJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a list of batch-render inputs from a JSON file.
///
/// Unlike [`read_records_json`], identifiers and tags may be missing.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_record_inputs_json(path: &Path) -> Result<Vec<RecordInput>, AnnorectError> {
    let file = File::open(path).map_err(AnnorectError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| AnnorectError::RecordsJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a list of records to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_records_json(path: &Path, records: &[AnnotationRecord]) -> Result<(), AnnorectError> {
    let file = File::create(path).map_err(AnnorectError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, records).map_err(|source| {
        AnnorectError::RecordsJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Parses a record list from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Vec<AnnotationRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a record list from raw bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<Vec<AnnotationRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes a record list to a pretty-printed JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(records: &[AnnotationRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}
