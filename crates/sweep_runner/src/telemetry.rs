//! Log output for the `sweep` binary.
//!
//! Events go to stderr so the run summary and `plan` listing on stdout stay
//! machine-readable. `RUST_LOG` overrides the verbosity flags.

use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Directive used when `RUST_LOG` is unset.
///
/// `--verbose` only raises this crate to debug (build reuse, artifact
/// publication); dependencies stay at info.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,sweep_runner=debug,sweep=debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber. Later calls leave the first one in place.
pub fn init_tracing(json: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // Targets only add noise at info; they help when tracing a debug run.
    let layer = fmt::layer().with_target(verbose).with_writer(io::stderr);
    let layer = if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .ok();
}
