//! Configuration errors raised while validating a sweep.

/// A degenerate or contradictory sweep declaration.
///
/// Every variant is fatal: a sweep that fails validation never processes a
/// single grid point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("sweep name cannot be empty")]
    EmptyName,

    #[error("output directory cannot be empty")]
    EmptyOutputDir,

    #[error("sweep must declare at least one axis")]
    NoAxes,

    #[error("axis names must be non-empty and contain no '=' or NUL characters (got {name:?})")]
    InvalidAxisName { name: String },

    #[error("axis '{name}' is declared more than once")]
    DuplicateAxis { name: String },

    #[error("axis '{name}' range [{start}, {stop}) step {step} yields no values")]
    EmptyRange {
        name: String,
        start: i64,
        stop: i64,
        step: i64,
    },

    #[error("label {label:?} on axis '{name}' must be non-empty ASCII letters")]
    InvalidLabel { name: String, label: String },

    #[error("label '{label}' is used by both '{first}' and '{second}'")]
    DuplicateLabel {
        label: String,
        first: String,
        second: String,
    },

    #[error("axis '{name}' varies across the sweep and needs a label to appear in artifact names")]
    MissingLabel { name: String },

    #[error("at least one axis must carry a label so artifacts have a name")]
    NoLabelledAxes,

    #[error("derived axis '{name}' refers to unknown independent axis '{source_axis}'")]
    UnknownDerivedSource { name: String, source_axis: String },

    #[error("derived axis '{name}' = {total} - {source_axis} is {value} when {source_axis} = {source_value}")]
    NegativeDerivedValue {
        name: String,
        total: i64,
        source_axis: String,
        source_value: i64,
        value: i64,
    },

    #[error("derived axis '{name}' overflows for {source_axis} = {source_value}")]
    DerivedOverflow {
        name: String,
        source_axis: String,
        source_value: i64,
    },

    #[error("axis '{name}' is a build parameter but the sweep declares no build step")]
    BuildStageWithoutBuild { name: String },

    #[error("{role} program cannot be empty")]
    EmptyProgram { role: &'static str },

    #[error("jobs must be a positive integer")]
    ZeroJobs,

    #[error("parameter space is too large ({points} points, limit {limit})")]
    TooManyPoints { points: u128, limit: usize },
}
