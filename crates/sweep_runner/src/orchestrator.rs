//! The sweep loop: resume check, build, run, publish, for every grid point.

use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use sweep_core::{ArtifactHandle, ParameterSet, RunOutcome, Stage, ValidatedSweep};
use tracing::{error, info, warn};

use crate::builder::BuildRunner;
use crate::error::{ExecutionError, PersistenceError};
use crate::execution::ExecutionRunner;
use crate::report::{PointReport, SweepReport};
use crate::resume::ResumeGuard;

/// Progress hooks invoked as the sweep advances.
///
/// Called from worker threads when the sweep runs in parallel.
pub trait SweepObserver: Sync {
    fn sweep_started(&self, _total_points: usize) {}
    fn point_finished(&self, _point: &PointReport) {}
    fn sweep_finished(&self, _report: &SweepReport) {}
}

pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

pub struct SweepOrchestrator<'a> {
    sweep: &'a ValidatedSweep,
    guard: ResumeGuard,
    builder: BuildRunner,
    executor: ExecutionRunner,
}

impl<'a> SweepOrchestrator<'a> {
    pub fn new(sweep: &'a ValidatedSweep) -> Self {
        Self {
            sweep,
            guard: ResumeGuard,
            builder: BuildRunner::new(sweep.spec().build.clone()),
            executor: ExecutionRunner::new(sweep.spec().executable.clone()),
        }
    }

    /// Processes every grid point and returns their outcomes in enumeration
    /// order. Per-point failures are recorded, never propagated.
    pub fn run(&mut self, observer: &dyn SweepObserver) -> SweepReport {
        let started = Instant::now();
        let started_at = Utc::now().to_rfc3339();
        let sweep = self.sweep;
        let output_dir = &sweep.spec().output_dir;

        info!(
            sweep = sweep.name(),
            fingerprint = sweep.fingerprint(),
            points = sweep.total_points(),
            output_dir = %output_dir.display(),
            "sweep started"
        );
        observer.sweep_started(sweep.total_points());

        match self.guard.purge_stale_partials(output_dir) {
            Ok(0) => {}
            Ok(removed) => info!(removed, "removed partial artifacts from an interrupted run"),
            Err(error) => warn!(%error, "could not scan output directory for partial artifacts"),
        }

        let points = match self.parallel_jobs() {
            Some(jobs) => self.run_parallel(jobs, observer),
            None => self.run_sequential(observer),
        };

        let report = SweepReport::new(
            sweep.name(),
            sweep.fingerprint(),
            started_at,
            started.elapsed().as_millis() as u64,
            self.builder.builds(),
            points,
        );
        let counts = report.counts();
        info!(
            sweep = sweep.name(),
            completed = counts.completed,
            skipped = counts.skipped,
            build_failed = counts.build_failed,
            execution_failed = counts.execution_failed,
            builds = report.builds,
            duration_ms = report.duration_ms,
            "sweep finished"
        );
        observer.sweep_finished(&report);
        report
    }

    fn parallel_jobs(&self) -> Option<usize> {
        let jobs = self.sweep.spec().jobs;
        if jobs <= 1 {
            return None;
        }
        if self.builder.is_configured() {
            warn!(
                jobs,
                "ignoring jobs: points share one build output and run sequentially"
            );
            return None;
        }
        Some(jobs)
    }

    fn run_sequential(&mut self, observer: &dyn SweepObserver) -> Vec<PointReport> {
        let sweep = self.sweep;
        let mut points = Vec::with_capacity(sweep.total_points());
        for (index, set) in sweep.grid().iter().enumerate() {
            let started = Instant::now();
            let outcome = self.evaluate(&set);
            let point = finish_point(index, set, outcome, started);
            observer.point_finished(&point);
            points.push(point);
        }
        points
    }

    fn run_parallel(&mut self, jobs: usize, observer: &dyn SweepObserver) -> Vec<PointReport> {
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool,
            Err(error) => {
                warn!(%error, "failed to create worker pool, running sequentially");
                return self.run_sequential(observer);
            }
        };

        let sweep = self.sweep;
        let guard = self.guard;
        let executor = &self.executor;
        let sets: Vec<ParameterSet> = sweep.grid().iter().collect();

        pool.install(|| {
            sets.into_par_iter()
                .enumerate()
                .map(|(index, set)| {
                    let started = Instant::now();
                    let handle = sweep.namer().handle(&set);
                    let outcome = if guard.is_satisfied(&handle) {
                        RunOutcome::Skipped {
                            handle: handle.into_path(),
                        }
                    } else {
                        execute(executor, sweep, &set, handle)
                    };
                    let point = finish_point(index, set, outcome, started);
                    observer.point_finished(&point);
                    point
                })
                .collect()
        })
    }

    /// Pending → Skipped | Building → BuildFailed | Running → outcome.
    fn evaluate(&mut self, set: &ParameterSet) -> RunOutcome {
        let handle = self.sweep.namer().handle(set);
        if self.guard.is_satisfied(&handle) {
            return RunOutcome::Skipped {
                handle: handle.into_path(),
            };
        }

        let build_params = self.sweep.stage_subset(set, Stage::Build);
        if let Err(error) = self.builder.ensure_built(&build_params) {
            return RunOutcome::BuildFailed {
                reason: error.to_string(),
            };
        }

        execute(&self.executor, self.sweep, set, handle)
    }
}

fn execute(
    executor: &ExecutionRunner,
    sweep: &ValidatedSweep,
    set: &ParameterSet,
    handle: ArtifactHandle,
) -> RunOutcome {
    let runtime_params = sweep.stage_subset(set, Stage::Runtime);
    match executor.run(&runtime_params, &handle) {
        Ok(()) => RunOutcome::Completed {
            handle: handle.into_path(),
        },
        // Another writer finished this point first; its artifact stands.
        Err(ExecutionError::Persistence(PersistenceError::AlreadyPublished { .. })) => {
            RunOutcome::Skipped {
                handle: handle.into_path(),
            }
        }
        Err(error) => RunOutcome::ExecutionFailed {
            reason: error.to_string(),
        },
    }
}

fn finish_point(
    index: usize,
    parameters: ParameterSet,
    outcome: RunOutcome,
    started: Instant,
) -> PointReport {
    match &outcome {
        RunOutcome::Completed { handle } => {
            info!(point = index, params = %parameters, handle = %handle.display(), "point completed");
        }
        RunOutcome::Skipped { handle } => {
            info!(point = index, params = %parameters, handle = %handle.display(), "point skipped, artifact present");
        }
        RunOutcome::BuildFailed { reason } => {
            error!(point = index, params = %parameters, %reason, "build failed");
        }
        RunOutcome::ExecutionFailed { reason } => {
            error!(point = index, params = %parameters, %reason, "execution failed");
        }
    }

    PointReport {
        index,
        parameters,
        outcome,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
