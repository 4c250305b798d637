//! Spec builders shared by unit tests.

use std::path::PathBuf;

use crate::contract::{AxisSpec, DerivedAxisSpec, ExecutableSpec, ParameterChannel, Stage, SweepSpec};

pub(crate) fn axis(name: &str, label: Option<&str>, start: i64, stop: i64, step: i64) -> AxisSpec {
    AxisSpec {
        name: name.to_string(),
        label: label.map(str::to_string),
        start,
        stop,
        step,
        stage: Stage::Runtime,
    }
}

pub(crate) fn derived(name: &str, label: Option<&str>, total: i64, minus: &str) -> DerivedAxisSpec {
    DerivedAxisSpec {
        name: name.to_string(),
        label: label.map(str::to_string),
        total,
        minus: minus.to_string(),
        stage: Stage::Runtime,
    }
}

pub(crate) fn spec_with(axes: Vec<AxisSpec>, derived: Vec<DerivedAxisSpec>) -> SweepSpec {
    SweepSpec {
        name: "unit".to_string(),
        output_dir: PathBuf::from("out"),
        axes,
        derived,
        build: None,
        executable: ExecutableSpec {
            program: "sim".to_string(),
            args: Vec::new(),
            working_dir: None,
            channel: ParameterChannel::Env,
            validate_json: true,
        },
        jobs: 1,
    }
}
