//! Per-point outcomes and sweep summaries.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use sweep_core::{ParameterSet, RunOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    /// Position of the point in enumeration order.
    pub index: usize,
    pub parameters: ParameterSet,
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub completed: usize,
    pub skipped: usize,
    pub build_failed: usize,
    pub execution_failed: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed { .. } => self.completed += 1,
            RunOutcome::Skipped { .. } => self.skipped += 1,
            RunOutcome::BuildFailed { .. } => self.build_failed += 1,
            RunOutcome::ExecutionFailed { .. } => self.execution_failed += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.build_failed + self.execution_failed
    }

    pub fn total(&self) -> usize {
        self.completed + self.skipped + self.failed()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub sweep: String,
    pub fingerprint: String,
    pub started_at: String,
    pub duration_ms: u64,
    /// Build processes launched during this sweep.
    pub builds: usize,
    pub counts: OutcomeCounts,
    pub points: Vec<PointReport>,
}

impl SweepReport {
    pub fn new(
        sweep: &str,
        fingerprint: &str,
        started_at: String,
        duration_ms: u64,
        builds: usize,
        points: Vec<PointReport>,
    ) -> Self {
        let mut counts = OutcomeCounts::default();
        for point in &points {
            counts.record(&point.outcome);
        }
        Self {
            sweep: sweep.to_string(),
            fingerprint: fingerprint.to_string(),
            started_at,
            duration_ms,
            builds,
            counts,
            points,
        }
    }

    pub fn counts(&self) -> &OutcomeCounts {
        &self.counts
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &PointReport> {
        self.points.iter().filter(|point| point.outcome.is_failure())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn point(index: usize, outcome: RunOutcome) -> PointReport {
        PointReport {
            index,
            parameters: ParameterSet::from_pairs([("NUM_CARS".to_string(), index as i64 * 50)]),
            outcome,
            duration_ms: 1,
        }
    }

    fn sample_report() -> SweepReport {
        SweepReport::new(
            "cars",
            "abc123",
            "2026-01-01T00:00:00+00:00".to_string(),
            10,
            1,
            vec![
                point(
                    0,
                    RunOutcome::Skipped {
                        handle: PathBuf::from("out/c0.json"),
                    },
                ),
                point(
                    1,
                    RunOutcome::Completed {
                        handle: PathBuf::from("out/c50.json"),
                    },
                ),
                point(
                    2,
                    RunOutcome::ExecutionFailed {
                        reason: "simulation exited with exit code 1".to_string(),
                    },
                ),
            ],
        )
    }

    #[test]
    fn counts_every_outcome_once() {
        let report = sample_report();
        assert_eq!(
            *report.counts(),
            OutcomeCounts {
                completed: 1,
                skipped: 1,
                build_failed: 0,
                execution_failed: 1,
            }
        );
        assert_eq!(report.counts().total(), 3);
        assert!(report.has_failures());
        assert_eq!(
            report.failures().map(|point| point.index).collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn writes_json_with_flattened_outcomes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        sample_report().write_json(&path).expect("write report");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read report"))
                .expect("report is json");
        assert_eq!(value["points"][1]["status"], "completed");
        assert_eq!(value["points"][1]["parameters"]["NUM_CARS"], 50);
        assert_eq!(value["points"][2]["reason"], "simulation exited with exit code 1");
        assert_eq!(value["counts"]["skipped"], 1);
    }
}
