use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use crate::grid::{GridEnumerator, ParameterSet};
use crate::naming::OutputNamer;

pub const MAX_TOTAL_PARAMETER_POINTS: usize = 200_000;
pub const DEFAULT_JOBS: usize = 1;

/// When a parameter value becomes visible to the simulation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Handed to the build process; changing it requires a rebuild.
    Build,
    /// Handed to the executable at launch.
    #[default]
    Runtime,
}

/// How runtime parameters reach the launched executable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParameterChannel {
    /// One environment variable per parameter, named after the axis.
    #[default]
    Env,
    /// `--<axis> <value>` pairs appended after the fixed arguments.
    Flags,
}

/// An independently enumerated axis over `[start, stop)` with a fixed stride.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AxisSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub start: i64,
    pub stop: i64,
    pub step: i64,
    #[serde(default)]
    pub stage: Stage,
}

impl AxisSpec {
    /// Number of values in the axis, zero for degenerate ranges.
    pub fn len(&self) -> u128 {
        if self.step <= 0 || self.start >= self.stop {
            return 0;
        }
        let span = (i128::from(self.stop) - i128::from(self.start)) as u128;
        let step = self.step as u128;
        span.div_ceil(step)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `index`, assuming `index < len()`.
    ///
    /// `step * index` may exceed `i64` on wide ranges even though the value
    /// itself lies below `stop`, so the offset is taken in `i128`.
    pub fn value_at(&self, index: usize) -> i64 {
        (i128::from(self.start) + i128::from(self.step) * index as i128) as i64
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len() as usize).map(move |index| self.value_at(index))
    }
}

/// An axis computed as `total - value(minus)` for every grid point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DerivedAxisSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub total: i64,
    pub minus: String,
    #[serde(default)]
    pub stage: Stage,
}

/// External build step producing the simulation executable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Path that must exist once the build succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
}

/// The simulation executable launched once per grid point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutableSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub channel: ParameterChannel,
    /// Reject runs whose stdout is not a single JSON document.
    #[serde(default = "default_validate_json")]
    pub validate_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepSpec {
    pub name: String,
    pub output_dir: PathBuf,
    pub axes: Vec<AxisSpec>,
    #[serde(default)]
    pub derived: Vec<DerivedAxisSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSpec>,
    pub executable: ExecutableSpec,
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

pub fn default_jobs() -> usize {
    DEFAULT_JOBS
}

fn default_validate_json() -> bool {
    true
}

/// Axis metadata in `ParameterSet` order: independent axes, then derived axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedAxis {
    pub(crate) name: String,
    pub(crate) label: Option<String>,
    pub(crate) stage: Stage,
}

/// A sweep that passed validation. Grid enumeration and naming are only
/// reachable through this type.
#[derive(Debug, Clone)]
pub struct ValidatedSweep {
    spec: SweepSpec,
    pub(crate) axes: Vec<ResolvedAxis>,
    pub(crate) derived_sources: Vec<usize>,
    total_points: usize,
    fingerprint: String,
}

impl SweepSpec {
    pub fn validate(self) -> Result<ValidatedSweep, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if self.axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }
        if self.jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        if self.executable.program.trim().is_empty() {
            return Err(ConfigError::EmptyProgram { role: "executable" });
        }
        match &self.build {
            Some(build) if build.program.trim().is_empty() => {
                return Err(ConfigError::EmptyProgram { role: "build" });
            }
            Some(_) => {}
            None => {
                let build_axis = self
                    .axes
                    .iter()
                    .map(|axis| (&axis.name, axis.stage))
                    .chain(self.derived.iter().map(|axis| (&axis.name, axis.stage)))
                    .find(|(_, stage)| *stage == Stage::Build);
                if let Some((name, _)) = build_axis {
                    return Err(ConfigError::BuildStageWithoutBuild { name: name.clone() });
                }
            }
        }

        let mut seen_names = HashSet::new();
        let all_names = self
            .axes
            .iter()
            .map(|axis| &axis.name)
            .chain(self.derived.iter().map(|axis| &axis.name));
        for name in all_names {
            if name.is_empty() || name.contains(['=', '\0']) {
                return Err(ConfigError::InvalidAxisName { name: name.clone() });
            }
            if !seen_names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateAxis { name: name.clone() });
            }
        }

        let mut total_points = 1u128;
        for axis in &self.axes {
            let len = axis.len();
            if len == 0 {
                return Err(ConfigError::EmptyRange {
                    name: axis.name.clone(),
                    start: axis.start,
                    stop: axis.stop,
                    step: axis.step,
                });
            }
            total_points = total_points.saturating_mul(len);
            if total_points > MAX_TOTAL_PARAMETER_POINTS as u128 {
                return Err(ConfigError::TooManyPoints {
                    points: total_points,
                    limit: MAX_TOTAL_PARAMETER_POINTS,
                });
            }
        }

        validate_labels(&self)?;
        let derived_sources = resolve_derived(&self)?;

        let axes = self
            .axes
            .iter()
            .map(|axis| ResolvedAxis {
                name: axis.name.clone(),
                label: axis.label.clone(),
                stage: axis.stage,
            })
            .chain(self.derived.iter().map(|axis| ResolvedAxis {
                name: axis.name.clone(),
                label: axis.label.clone(),
                stage: axis.stage,
            }))
            .collect();

        let fingerprint = spec_fingerprint(&self);
        Ok(ValidatedSweep {
            spec: self,
            axes,
            derived_sources,
            total_points: total_points as usize,
            fingerprint,
        })
    }
}

fn validate_labels(spec: &SweepSpec) -> Result<(), ConfigError> {
    // Keyed case-insensitively: `c` and `C` name the same file on APFS and NTFS.
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();
    let labelled = spec
        .axes
        .iter()
        .map(|axis| (&axis.name, &axis.label))
        .chain(spec.derived.iter().map(|axis| (&axis.name, &axis.label)));

    for (name, label) in labelled {
        let Some(label) = label else {
            continue;
        };
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidLabel {
                name: name.clone(),
                label: label.clone(),
            });
        }
        if let Some(first) = owners.insert(label.to_ascii_lowercase(), name.as_str()) {
            return Err(ConfigError::DuplicateLabel {
                label: label.clone(),
                first: first.to_string(),
                second: name.clone(),
            });
        }
    }

    if owners.is_empty() {
        return Err(ConfigError::NoLabelledAxes);
    }

    // Derived axes are functions of labelled independent axes, so only the
    // independent ones have to appear in the name.
    for axis in &spec.axes {
        if axis.len() > 1 && axis.label.is_none() {
            return Err(ConfigError::MissingLabel {
                name: axis.name.clone(),
            });
        }
    }

    Ok(())
}

fn resolve_derived(spec: &SweepSpec) -> Result<Vec<usize>, ConfigError> {
    let mut sources = Vec::with_capacity(spec.derived.len());
    for derived in &spec.derived {
        let source_index = spec
            .axes
            .iter()
            .position(|axis| axis.name == derived.minus)
            .ok_or_else(|| ConfigError::UnknownDerivedSource {
                name: derived.name.clone(),
                source_axis: derived.minus.clone(),
            })?;

        let source = &spec.axes[source_index];
        for source_value in source.values() {
            let value = derived.total.checked_sub(source_value).ok_or_else(|| {
                ConfigError::DerivedOverflow {
                    name: derived.name.clone(),
                    source_axis: source.name.clone(),
                    source_value,
                }
            })?;
            if value < 0 {
                return Err(ConfigError::NegativeDerivedValue {
                    name: derived.name.clone(),
                    total: derived.total,
                    source_axis: source.name.clone(),
                    source_value,
                    value,
                });
            }
        }
        sources.push(source_index);
    }
    Ok(sources)
}

/// SHA-256 over the canonical JSON encoding of the sweep declaration.
pub fn spec_fingerprint(spec: &SweepSpec) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(spec).unwrap_or_default());
    format!("{:x}", hasher.finalize())
}

impl ValidatedSweep {
    pub fn spec(&self) -> &SweepSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn total_points(&self) -> usize {
        self.total_points
    }

    pub fn grid(&self) -> GridEnumerator<'_> {
        GridEnumerator::new(self)
    }

    pub fn namer(&self) -> OutputNamer<'_> {
        OutputNamer::new(self)
    }

    /// Whether any axis feeds the build process.
    pub fn has_build_stage(&self) -> bool {
        self.axes.iter().any(|axis| axis.stage == Stage::Build)
    }

    /// The subset of `set` whose axes belong to `stage`, in declared order.
    pub fn stage_subset(&self, set: &ParameterSet, stage: Stage) -> ParameterSet {
        ParameterSet::from_pairs(
            self.axes
                .iter()
                .zip(set.iter())
                .filter(|(axis, _)| axis.stage == stage)
                .map(|(_, (name, value))| (name.to_string(), value)),
        )
    }
}
