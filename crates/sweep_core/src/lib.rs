//! Deterministic sweep domain primitives.
//!
//! This crate owns the sweep contract (axes, derived axes, validation), grid
//! enumeration, and artifact naming. It performs no I/O: launching builds and
//! simulation processes lives in `sweep_runner`.

pub mod contract;
pub mod error;
pub mod grid;
pub mod naming;
pub mod outcome;

#[cfg(test)]
mod test_helpers;

pub use contract::{
    AxisSpec, BuildSpec, DerivedAxisSpec, ExecutableSpec, ParameterChannel, Stage, SweepSpec,
    ValidatedSweep,
};
pub use error::ConfigError;
pub use grid::{GridEnumerator, GridIter, ParameterSet};
pub use naming::{ArtifactHandle, OutputNamer, ARTIFACT_EXTENSION};
pub use outcome::RunOutcome;
