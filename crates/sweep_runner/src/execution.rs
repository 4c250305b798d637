//! Launching the simulation for one grid point and persisting its output.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use sweep_core::{ArtifactHandle, ExecutableSpec, ParameterChannel, ParameterSet};
use tracing::debug;

use crate::artifact::publish_atomically;
use crate::error::ExecutionError;
use crate::process::{describe_status, stderr_tail};

/// Everything needed to launch the executable for one grid point.
///
/// Built fresh per point and applied to a new `Command`, so no value from a
/// previous point can leak into the next launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl LaunchConfig {
    pub fn for_point(spec: &ExecutableSpec, runtime_params: &ParameterSet) -> Self {
        let mut args = spec.args.clone();
        let mut env = BTreeMap::new();

        match spec.channel {
            ParameterChannel::Env => {
                env.extend(
                    runtime_params
                        .iter()
                        .map(|(name, value)| (name.to_string(), value.to_string())),
                );
            }
            ParameterChannel::Flags => {
                for (name, value) in runtime_params.iter() {
                    args.push(format!("--{name}"));
                    args.push(value.to_string());
                }
            }
        }

        Self {
            program: spec.program.clone(),
            args,
            working_dir: spec.working_dir.clone(),
            env,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionRunner {
    spec: ExecutableSpec,
}

impl ExecutionRunner {
    pub fn new(spec: ExecutableSpec) -> Self {
        Self { spec }
    }

    /// Runs the executable to completion and publishes its stdout at `handle`.
    ///
    /// Nothing is written at the handle unless the process exits successfully
    /// and (when enabled) its stdout parses as JSON.
    pub fn run(
        &self,
        runtime_params: &ParameterSet,
        handle: &ArtifactHandle,
    ) -> Result<(), ExecutionError> {
        let launch = LaunchConfig::for_point(&self.spec, runtime_params);
        let stdout = self.capture(&launch)?;

        if self.spec.validate_json {
            serde_json::from_slice::<serde_json::Value>(&stdout)
                .map_err(|source| ExecutionError::InvalidOutput { source })?;
        }

        publish_atomically(handle, &stdout)?;
        debug!(handle = %handle, bytes = stdout.len(), "artifact published");
        Ok(())
    }

    fn capture(&self, launch: &LaunchConfig) -> Result<Vec<u8>, ExecutionError> {
        let output = launch
            .command()
            .output()
            .map_err(|source| ExecutionError::Launch {
                program: launch.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                status: describe_status(output.status),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(output.stdout)
    }
}
