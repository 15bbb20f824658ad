//! In-memory zip packaging for one asset version: a `metadata.json` entry
//! followed by the stored files under `files/`.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct PackageEntry {
    pub filename: String,
    pub abs_path: PathBuf,
}

/// Build the zip bytes. Entries whose file is gone from disk are skipped so a
/// partially-missing version still packages.
pub fn build(metadata: &serde_json::Value, entries: &[PackageEntry]) -> Result<Vec<u8>, PackageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("metadata.json", options)?;
    zip.write_all(&serde_json::to_vec_pretty(metadata)?)?;

    for entry in entries {
        if !entry.abs_path.is_file() {
            continue;
        }
        zip.start_file(format!("files/{}", entry.filename), options)?;
        zip.write_all(&std::fs::read(&entry.abs_path)?)?;
    }

    Ok(zip.finish()?.into_inner())
}
