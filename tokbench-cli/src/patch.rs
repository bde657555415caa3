//! Document Patching
//!
//! Replaces the marker-delimited section of a document with a freshly
//! rendered one. The section runs from the first occurrence of the start
//! marker up to (not including) the first occurrence of the end marker.
//! Everything outside it is kept byte-for-byte.
//!
//! Writes go through a temporary file in the target's directory that is
//! persisted over the original, so an interrupted run leaves either the old
//! document or the new one, never a truncated file.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Document patch failures; none of them abort the run
#[derive(Debug, Error)]
pub enum PatchError {
    /// A marker does not occur in the document
    #[error("Marker '{marker}' not found in document")]
    MarkerNotFound {
        /// The missing marker text
        marker: String,
    },

    /// The end marker first occurs before the start marker
    #[error("End marker '{end}' appears before start marker '{start}'")]
    MarkersOutOfOrder {
        /// Start marker text
        start: String,
        /// End marker text
        end: String,
    },

    /// Reading or writing the document failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Moving the temporary file over the document failed
    #[error("Failed to replace {path}: {source}")]
    Persist {
        /// Target document
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: tempfile::PersistError,
    },
}

/// Replace the section between `start_marker` and `end_marker`
///
/// Returns `document[..start] + replacement + "\n\n" + document[end..]`.
/// The start marker itself is part of the replaced region, so `replacement`
/// is expected to begin with it.
pub fn patch_section(
    document: &str,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Result<String, PatchError> {
    let start = document
        .find(start_marker)
        .ok_or_else(|| PatchError::MarkerNotFound {
            marker: start_marker.to_string(),
        })?;
    let end = document
        .find(end_marker)
        .ok_or_else(|| PatchError::MarkerNotFound {
            marker: end_marker.to_string(),
        })?;

    if end < start {
        return Err(PatchError::MarkersOutOfOrder {
            start: start_marker.to_string(),
            end: end_marker.to_string(),
        });
    }

    let mut patched =
        String::with_capacity(document.len() - (end - start) + replacement.len() + 2);
    patched.push_str(&document[..start]);
    patched.push_str(replacement);
    patched.push_str("\n\n");
    patched.push_str(&document[end..]);
    Ok(patched)
}

/// Patch the document at `path` in place
///
/// The patch is computed fully in memory before anything is written; a
/// missing marker leaves the file untouched.
pub fn commit_patch(
    path: &Path,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Result<(), PatchError> {
    let io_err = |source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let document = std::fs::read_to_string(path).map_err(io_err)?;
    let patched = patch_section(&document, start_marker, end_marker, replacement)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path).map_err(io_err)?.permissions();
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(patched.as_bytes()).map_err(io_err)?;
    // The temp file is created 0600; the document keeps its own mode
    tmp.as_file().set_permissions(permissions).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|source| PatchError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = patched.len(), "document patched");
    Ok(())
}
