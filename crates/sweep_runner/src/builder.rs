//! Build step for sweeps whose executable depends on compile-time parameters.

use std::process::{Command, Stdio};
use std::time::Instant;

use sweep_core::{BuildSpec, ParameterSet};
use tracing::{debug, info};

use crate::error::BuildError;
use crate::process::{describe_status, stderr_tail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// The sweep declares no build step.
    NotConfigured,
    /// The previous build used identical compile-time parameters.
    Reused,
    Rebuilt,
}

/// Runs the external build with compile-time parameters as environment
/// variables, remembering the parameters of the last successful build.
#[derive(Debug, Clone)]
pub struct BuildRunner {
    spec: Option<BuildSpec>,
    last_built: Option<ParameterSet>,
    builds: usize,
}

impl BuildRunner {
    pub fn new(spec: Option<BuildSpec>) -> Self {
        Self {
            spec,
            last_built: None,
            builds: 0,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.spec.is_some()
    }

    /// Number of build processes launched so far.
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Makes sure the executable reflects `params`, rebuilding if needed.
    ///
    /// A failed build invalidates the cache, so the next point always
    /// rebuilds rather than running a stale executable.
    pub fn ensure_built(&mut self, params: &ParameterSet) -> Result<BuildStatus, BuildError> {
        let Some(spec) = &self.spec else {
            return Ok(BuildStatus::NotConfigured);
        };

        if self.last_built.as_ref() == Some(params) {
            debug!(params = %params, "reusing executable built for identical parameters");
            return Ok(BuildStatus::Reused);
        }

        self.last_built = None;
        self.builds += 1;
        run_build(spec, params)?;
        self.last_built = Some(params.clone());
        Ok(BuildStatus::Rebuilt)
    }
}

fn run_build(spec: &BuildSpec, params: &ParameterSet) -> Result<(), BuildError> {
    let started_at = Instant::now();
    info!(program = %spec.program, params = %params, "building executable");

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .envs(params.iter().map(|(name, value)| (name, value.to_string())))
        .stdin(Stdio::null());
    if let Some(dir) = &spec.working_dir {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|source| BuildError::Launch {
        program: spec.program.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(BuildError::Failed {
            status: describe_status(output.status),
            stderr: stderr_tail(&output.stderr),
        });
    }

    if let Some(executable) = &spec.executable {
        let path = match &spec.working_dir {
            Some(dir) if executable.is_relative() => dir.join(executable),
            _ => executable.clone(),
        };
        if !path.is_file() {
            return Err(BuildError::MissingExecutable { path });
        }
    }

    debug!(
        duration_ms = started_at.elapsed().as_millis() as u64,
        "build finished"
    );
    Ok(())
}
