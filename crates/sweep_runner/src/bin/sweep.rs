use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use sweep_runner::report::PointReport;
use sweep_runner::telemetry::init_tracing;
use sweep_runner::{load_sweep_spec, ResumeGuard, SweepObserver, SweepOrchestrator, SweepReport};
use tracing::error;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "sweep",
    about = "Run a simulation executable across a parameter grid",
    long_about = "Drives a simulation executable over every point of a parameter grid,\n\
                  writing one JSON artifact per point. Re-running a sweep skips points\n\
                  whose artifact already exists."
)]
struct Cli {
    /// Emit newline-delimited JSON logs
    #[arg(long, global = true, env = "SWEEP_JSON_LOGS")]
    json_logs: bool,

    /// Log build reuse and publication details (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run (or resume) a sweep
    Run {
        /// Sweep declaration (JSON)
        #[arg(long, short)]
        config: PathBuf,
        /// Worker threads; only honoured when the sweep has no build step
        #[arg(long)]
        jobs: Option<usize>,
        /// Write the per-point report to this file
        #[arg(long)]
        report: Option<PathBuf>,
        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },
    /// List every grid point with its artifact and whether it would be skipped
    Plan {
        /// Sweep declaration (JSON)
        #[arg(long, short)]
        config: PathBuf,
    },
}

const EXIT_POINT_FAILURES: u8 = 1;
const EXIT_CONFIGURATION: u8 = 2;

// ── progress ───────────────────────────────────────────────────────

struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }
}

impl SweepObserver for ProgressObserver {
    fn sweep_started(&self, total_points: usize) {
        self.bar.set_length(total_points as u64);
    }

    fn point_finished(&self, point: &PointReport) {
        self.bar.set_message(point.outcome.as_str());
        self.bar.inc(1);
    }

    fn sweep_finished(&self, _report: &SweepReport) {
        self.bar.finish_and_clear();
    }
}

// ── commands ───────────────────────────────────────────────────────

fn configuration_failure(error: &dyn std::error::Error) -> ExitCode {
    error!(%error, "cannot start sweep");
    ExitCode::from(EXIT_CONFIGURATION)
}

fn run_sweep(
    config: PathBuf,
    jobs: Option<usize>,
    report_path: Option<PathBuf>,
    no_progress: bool,
) -> anyhow::Result<ExitCode> {
    let sweep = match load_sweep_spec(&config) {
        Ok(sweep) => sweep,
        Err(error) => return Ok(configuration_failure(&error)),
    };
    let sweep = match jobs {
        Some(jobs) => {
            let mut spec = sweep.spec().clone();
            spec.jobs = jobs;
            match spec.validate() {
                Ok(sweep) => sweep,
                Err(error) => return Ok(configuration_failure(&error)),
            }
        }
        None => sweep,
    };

    let observer = ProgressObserver::new(!no_progress);
    let report = SweepOrchestrator::new(&sweep).run(&observer);

    if let Some(path) = &report_path {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    print_summary(&report);
    if report.has_failures() {
        Ok(ExitCode::from(EXIT_POINT_FAILURES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_summary(report: &SweepReport) {
    let counts = report.counts();
    println!(
        "{}: {} completed, {} skipped, {} build failed, {} execution failed ({} builds, {:.1}s)",
        report.sweep,
        counts.completed,
        counts.skipped,
        counts.build_failed,
        counts.execution_failed,
        report.builds,
        report.duration_ms as f64 / 1_000.0
    );
    for point in report.failures() {
        println!("  [{}] {}: {}", point.index, point.parameters, point.outcome.as_str());
    }
}

fn plan_sweep(config: PathBuf) -> anyhow::Result<ExitCode> {
    let sweep = match load_sweep_spec(&config) {
        Ok(sweep) => sweep,
        Err(error) => return Ok(configuration_failure(&error)),
    };

    let guard = ResumeGuard;
    let namer = sweep.namer();
    let mut pending = 0usize;
    for (index, set) in sweep.grid().iter().enumerate() {
        let handle = namer.handle(&set);
        let status = if guard.is_satisfied(&handle) {
            "present"
        } else {
            pending += 1;
            "pending"
        };
        println!("{index:>6}  {status:<8} {handle}  {set}");
    }
    println!(
        "{}: {} points, {} pending (fingerprint {})",
        sweep.name(),
        sweep.total_points(),
        pending,
        sweep.fingerprint()
    );
    Ok(ExitCode::SUCCESS)
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs, cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            jobs,
            report,
            no_progress,
        } => run_sweep(config, jobs, report, no_progress),
        Commands::Plan { config } => plan_sweep(config),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            error!(error = %format!("{error:#}"), "sweep aborted");
            ExitCode::FAILURE
        }
    }
}
