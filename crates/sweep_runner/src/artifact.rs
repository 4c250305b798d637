//! Atomic publication of captured simulation output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use sweep_core::ArtifactHandle;
use tempfile::NamedTempFile;

use crate::error::PersistenceError;
use crate::resume::PARTIAL_PREFIX;

/// Writes `bytes` to a staging file next to the handle, syncs it, then
/// renames it into place without replacing an existing artifact.
///
/// Readers observe either no file or the complete artifact. If another writer
/// published the same handle first, the staged copy is discarded and
/// [`PersistenceError::AlreadyPublished`] is returned.
pub fn publish_atomically(handle: &ArtifactHandle, bytes: &[u8]) -> Result<(), PersistenceError> {
    let path = handle.path();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let stage_error = |source| PersistenceError::Stage {
        dir: dir.to_path_buf(),
        source,
    };
    let mut staged = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(stage_error)?;
    write_staged(&mut staged, bytes).map_err(stage_error)?;

    staged.persist_noclobber(path).map_err(|error| {
        if error.error.kind() == io::ErrorKind::AlreadyExists {
            PersistenceError::AlreadyPublished {
                path: path.to_path_buf(),
            }
        } else {
            PersistenceError::Publish {
                path: path.to_path_buf(),
                source: error.error,
            }
        }
    })?;
    Ok(())
}

fn write_staged(staged: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.as_file().sync_all()
}
