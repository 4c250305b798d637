//! Local sweep engine for driving a simulation executable across a parameter grid.
//!
//! The orchestrator walks every grid point of a validated sweep, skips points
//! whose artifact is already on disk, rebuilds the executable when
//! compile-time parameters change, and publishes each run's stdout atomically.
//!
//! # Quick Start
//!
//! ```no_run
//! use sweep_runner::{load_sweep_spec, NoopObserver, SweepOrchestrator};
//!
//! let sweep = load_sweep_spec("sweeps/cars_bikes.json")?;
//! let report = SweepOrchestrator::new(&sweep).run(&NoopObserver);
//! println!("{} failed points", report.counts().failed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`resume`]: artifact presence checks and stale temp-file cleanup
//! - [`builder`]: build step with a cache keyed by compile-time parameters
//! - [`execution`]: per-point launch configuration and stdout capture
//! - [`artifact`]: atomic publication of captured output
//! - [`orchestrator`]: the sweep loop
//! - [`report`]: per-point outcomes and summary counts

pub mod artifact;
pub mod builder;
pub mod config;
pub mod error;
pub mod execution;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod resume;
pub mod telemetry;

pub use builder::{BuildRunner, BuildStatus};
pub use config::load_sweep_spec;
pub use error::{BuildError, ExecutionError, LoadError, PersistenceError};
pub use execution::{ExecutionRunner, LaunchConfig};
pub use orchestrator::{NoopObserver, SweepObserver, SweepOrchestrator};
pub use report::{OutcomeCounts, PointReport, SweepReport};
pub use resume::ResumeGuard;
