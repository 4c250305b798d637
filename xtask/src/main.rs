use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the sweep workspace",
    long_about = "A unified CLI for running demo sweeps and CI checks\n\
                  in the sweep workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run (or resume) a sweep declared in a JSON file
    Sweep {
        /// Sweep declaration
        #[arg(long, default_value = "demos/cars_bikes.json")]
        config: String,
        /// Worker threads for sweeps without a build step
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Show which points of a sweep are still pending
    Plan {
        /// Sweep declaration
        #[arg(long, default_value = "demos/cars_bikes.json")]
        config: String,
    },
    /// Delete the demo sweep output so the next run starts from scratch
    CleanDemos,
    /// Run CI checks (fmt, clippy, tests, demo sweeps)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run the demo sweeps twice and confirm the second pass resumes
    Demos,
    /// Run check + demos
    All,
}

const DEMO_CONFIGS: &[&str] = &["demos/cars_bikes.json", "demos/lane_split.json"];
const DEMO_OUTPUT: &str = "target/sweeps";

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn sweep_cli(extra: &[&str]) {
    let mut args = vec!["run", "-p", "sweep_runner", "--bin", "sweep", "--"];
    args.extend_from_slice(extra);
    run_cargo(&args);
}

fn clean_demos() {
    let output = Path::new(DEMO_OUTPUT);
    if output.exists() {
        step("Removing demo sweep output");
        std::fs::remove_dir_all(output).expect("failed to remove demo sweep output");
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test sweep_core");
    run_cargo(&["test", "-p", "sweep_core"]);

    step("Test sweep_runner");
    run_cargo(&["test", "-p", "sweep_runner"]);
}

fn ci_demos() {
    clean_demos();
    for config in DEMO_CONFIGS {
        step(&format!("Sweep {config}"));
        sweep_cli(&["run", "--config", config, "--no-progress"]);

        step(&format!("Resume {config}"));
        sweep_cli(&["run", "--config", config, "--no-progress"]);
    }
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep { config, jobs } => {
            let jobs = jobs.map(|jobs| jobs.to_string());
            let mut args = vec!["run", "--config", config.as_str()];
            if let Some(jobs) = &jobs {
                args.extend_from_slice(&["--jobs", jobs.as_str()]);
            }
            sweep_cli(&args);
        }
        Commands::Plan { config } => {
            sweep_cli(&["plan", "--config", &config]);
        }
        Commands::CleanDemos => clean_demos(),
        Commands::Ci { job } => match job {
            CiJob::Check => ci_check(),
            CiJob::Demos => ci_demos(),
            CiJob::All => {
                ci_check();
                ci_demos();
            }
        },
    }
}
