//! Shared plumbing for the owl-docsgen binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process::ExitCode;

use owl_docsgen::DocsgenError;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, `debug` with
/// `verbose` and `error` with `quiet`.
pub fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the cause chain and picks the exit status: the pipeline's own
/// code when the failure came from it, 1 otherwise.
#[must_use]
pub fn report_failure(err: &anyhow::Error) -> ExitCode {
    eprintln!("error: {err:#}");
    let code = err
        .downcast_ref::<DocsgenError>()
        .map_or(1, DocsgenError::exit_code);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
