//! Loading sweep declarations from JSON files.

use std::fs;
use std::path::Path;

use sweep_core::{SweepSpec, ValidatedSweep};

use crate::error::LoadError;

/// Reads, parses, and validates a sweep file.
///
/// Relative paths inside the file (output directory, programs, working
/// directories) are resolved against the process working directory.
pub fn load_sweep_spec(path: impl AsRef<Path>) -> Result<ValidatedSweep, LoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let spec: SweepSpec = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(spec.validate()?)
}
