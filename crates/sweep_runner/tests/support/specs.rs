use std::path::Path;

use sweep_core::{
    AxisSpec, BuildSpec, DerivedAxisSpec, ExecutableSpec, ParameterChannel, Stage, SweepSpec,
};

use super::workspace::TestWorkspace;

pub const RUNS_LOG: &str = "runs.log";
pub const BUILDS_LOG: &str = "builds.log";

pub fn axis(name: &str, label: &str, start: i64, stop: i64, step: i64, stage: Stage) -> AxisSpec {
    AxisSpec {
        name: name.to_string(),
        label: Some(label.to_string()),
        start,
        stop,
        step,
        stage,
    }
}

pub fn shell_executable(script: &Path) -> ExecutableSpec {
    ExecutableSpec {
        program: "/bin/sh".to_string(),
        args: vec![script.display().to_string()],
        working_dir: None,
        channel: ParameterChannel::Env,
        validate_json: true,
    }
}

/// Simulation that records each launch and prints its parameters as JSON.
/// Exits with status 3 when `NUM_CARS` equals `fail_cars`.
pub fn cars_bikes_simulation(workspace: &TestWorkspace, fail_cars: Option<i64>) -> ExecutableSpec {
    let log = workspace.log_path(RUNS_LOG);
    let fail_check = match fail_cars {
        Some(cars) => format!(
            "if [ \"$NUM_CARS\" = \"{cars}\" ]; then echo 'road too crowded' >&2; exit 3; fi\n"
        ),
        None => String::new(),
    };
    let script = workspace.write_script(
        "sim.sh",
        &format!(
            "echo \"$NUM_CARS,$NUM_BIKES\" >> '{}'\n\
             {fail_check}\
             printf '{{\"cars\": %s, \"bikes\": %s}}\\n' \"$NUM_CARS\" \"$NUM_BIKES\"\n",
            log.display()
        ),
    );
    shell_executable(&script)
}

/// car ∈ [0,100) step 50, bike ∈ [0,100) step 50, both runtime parameters.
pub fn cars_bikes_spec(workspace: &TestWorkspace, executable: ExecutableSpec) -> SweepSpec {
    SweepSpec {
        name: "cars-bikes".to_string(),
        output_dir: workspace.output_dir(),
        axes: vec![
            axis("NUM_CARS", "c", 0, 100, 50, Stage::Runtime),
            axis("NUM_BIKES", "b", 0, 100, 50, Stage::Runtime),
        ],
        derived: Vec::new(),
        build: None,
        executable,
        jobs: 1,
    }
}

/// Build script that records each build and bakes the compile-time values
/// into `constants.json`, which the simulation then prints. Fails when
/// `NUM_CARS` equals `fail_cars`.
pub fn constants_build(workspace: &TestWorkspace, fail_cars: Option<i64>) -> BuildSpec {
    let log = workspace.log_path(BUILDS_LOG);
    let constants = workspace.path().join("constants.json");
    let fail_check = match fail_cars {
        Some(cars) => format!(
            "if [ \"$NUM_CARS\" = \"{cars}\" ]; then rm -f '{}'; echo 'error: could not compile' >&2; exit 101; fi\n",
            constants.display()
        ),
        None => String::new(),
    };
    let script = workspace.write_script(
        "build.sh",
        &format!(
            "echo \"$NUM_CARS,$BL_WIDTH,$ML_WIDTH\" >> '{}'\n\
             {fail_check}\
             printf '{{\"cars\": %s, \"bl_width\": %s, \"ml_width\": %s' \"$NUM_CARS\" \"$BL_WIDTH\" \"$ML_WIDTH\" > '{}'\n",
            log.display(),
            constants.display()
        ),
    );
    BuildSpec {
        program: "/bin/sh".to_string(),
        args: vec![script.display().to_string()],
        working_dir: Some(workspace.path().to_path_buf()),
        executable: Some(constants),
    }
}

/// Simulation that prints the baked constants plus its runtime bike count.
pub fn constants_simulation(workspace: &TestWorkspace) -> ExecutableSpec {
    let log = workspace.log_path(RUNS_LOG);
    let constants = workspace.path().join("constants.json");
    let script = workspace.write_script(
        "sim.sh",
        &format!(
            "echo \"$NUM_BIKES\" >> '{}'\n\
             cat '{}'\n\
             printf ', \"bikes\": %s}}\\n' \"$NUM_BIKES\"\n",
            log.display(),
            constants.display()
        ),
    );
    shell_executable(&script)
}

/// Cars and lane split are compile-time; bikes vary at runtime.
pub fn lane_split_spec(workspace: &TestWorkspace, fail_cars: Option<i64>) -> SweepSpec {
    SweepSpec {
        name: "lane-split".to_string(),
        output_dir: workspace.output_dir(),
        axes: vec![
            axis("NUM_CARS", "c", 0, 100, 50, Stage::Build),
            axis("BL_WIDTH", "w", 2, 6, 2, Stage::Build),
            axis("NUM_BIKES", "b", 0, 20, 10, Stage::Runtime),
        ],
        derived: vec![DerivedAxisSpec {
            name: "ML_WIDTH".to_string(),
            label: None,
            total: 14,
            minus: "BL_WIDTH".to_string(),
            stage: Stage::Build,
        }],
        build: Some(constants_build(workspace, fail_cars)),
        executable: constants_simulation(workspace),
        jobs: 1,
    }
}
