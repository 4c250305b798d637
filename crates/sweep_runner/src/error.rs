//! Error types for loading sweeps and processing grid points.

use std::path::PathBuf;

use sweep_core::ConfigError;

use crate::process::stderr_suffix;

/// Failure to turn a sweep file into a validated sweep.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read sweep file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sweep file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid sweep configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// The build step did not produce a usable executable.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to launch build command `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build command exited with {status}{}", stderr_suffix(.stderr))]
    Failed { status: String, stderr: String },

    #[error("build succeeded but executable {} is missing", .path.display())]
    MissingExecutable { path: PathBuf },
}

/// The executable did not produce a publishable artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("simulation exited with {status}{}", stderr_suffix(.stderr))]
    Failed { status: String, stderr: String },

    #[error("simulation output is not a JSON document: {source}")]
    InvalidOutput {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Captured output could not be published at its handle.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stage artifact in {}: {source}", .dir.display())]
    Stage {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to publish artifact {}: {source}", .path.display())]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} was published by another writer", .path.display())]
    AlreadyPublished { path: PathBuf },
}
