//! Catalog document output.
//!
//! Pretty JSON (2-space indent, UTF-8, non-ASCII kept literal). The document
//! is written to a temporary file next to the target and renamed into place,
//! so a failed run never leaves a partial output file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::OutputError;

/// Serialize to pretty JSON with a trailing newline.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write a document to `path`, creating missing parent directories.
pub fn write_catalog<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<(), OutputError> {
    let json = to_json_pretty(document)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => {
            fs::create_dir_all(p)?;
            p
        }
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = json.len(), "wrote catalog document");
    Ok(())
}
