//! Resumption checks: an artifact on disk is the only record of completion.

use std::fs;
use std::io;
use std::path::Path;

use sweep_core::ArtifactHandle;
use tracing::debug;

/// Prefix of staging files written before an artifact is published.
pub const PARTIAL_PREFIX: &str = ".partial-";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResumeGuard;

impl ResumeGuard {
    /// Whether a complete artifact already exists at `handle`.
    ///
    /// Publication is an atomic rename, so any regular file at the handle is
    /// a complete artifact.
    pub fn is_satisfied(&self, handle: &ArtifactHandle) -> bool {
        fs::metadata(handle.path())
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    /// Removes staging files left behind by an interrupted sweep.
    ///
    /// Returns the number of files removed. A missing directory is not an
    /// error: nothing has been published there yet.
    ///
    /// The output directory belongs to one sweep process at a time. A second
    /// process started on the same directory would remove the first one's
    /// in-flight staging files and fail those points.
    pub fn purge_stale_partials(&self, output_dir: &Path) -> io::Result<usize> {
        let entries = match fs::read_dir(output_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(error),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let is_partial = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(PARTIAL_PREFIX));
            if is_partial && entry.file_type()?.is_file() {
                debug!(path = %entry.path().display(), "removing stale partial artifact");
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
