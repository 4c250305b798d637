use std::path::{Path, PathBuf};

use serde::Serialize;

/// Terminal state of one grid point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The artifact was written during this sweep.
    Completed { handle: PathBuf },
    /// An artifact was already present; no work was done.
    Skipped { handle: PathBuf },
    BuildFailed { reason: String },
    ExecutionFailed { reason: String },
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Skipped { .. } => "skipped",
            Self::BuildFailed { .. } => "build_failed",
            Self::ExecutionFailed { .. } => "execution_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::BuildFailed { .. } | Self::ExecutionFailed { .. })
    }

    pub fn handle(&self) -> Option<&Path> {
        match self {
            Self::Completed { handle } | Self::Skipped { handle } => Some(handle),
            Self::BuildFailed { .. } | Self::ExecutionFailed { .. } => None,
        }
    }
}
