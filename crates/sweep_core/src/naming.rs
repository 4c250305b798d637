use std::fmt;
use std::path::{Path, PathBuf};

use crate::contract::ValidatedSweep;
use crate::grid::ParameterSet;

pub const ARTIFACT_EXTENSION: &str = "json";

/// Canonical location of the artifact for one grid point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle {
    path: PathBuf,
}

impl ArtifactHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Maps grid points to artifact names such as `c50b0.json`.
///
/// Labels are ASCII letters and values are decimal integers, so the
/// concatenation decodes uniquely and two points never share a name.
#[derive(Debug, Clone, Copy)]
pub struct OutputNamer<'a> {
    sweep: &'a ValidatedSweep,
}

impl<'a> OutputNamer<'a> {
    pub(crate) fn new(sweep: &'a ValidatedSweep) -> Self {
        Self { sweep }
    }

    pub fn file_name(&self, set: &ParameterSet) -> String {
        let mut name = String::new();
        for (axis, (_, value)) in self.sweep.axes.iter().zip(set.iter()) {
            if let Some(label) = &axis.label {
                name.push_str(label);
                name.push_str(&value.to_string());
            }
        }
        format!("{name}.{ARTIFACT_EXTENSION}")
    }

    pub fn handle(&self, set: &ParameterSet) -> ArtifactHandle {
        ArtifactHandle {
            path: self.sweep.spec().output_dir.join(self.file_name(set)),
        }
    }
}
