//! Diagnostic and success output.
//!
//! Verbose parameter diagnostics (`-v`) go through `tracing`, alongside any
//! other structured logging; the plain success/failure lines a user runs this
//! for are unconditional `println!`/`eprintln!`, not log records — see
//! SPEC_FULL.md §10.1.

use std::path::Path;

use tracing::info;

use crate::config::APP_NAME;
use crate::session::ChosenParams;

/// Initializes the global `tracing` subscriber. `-v` raises the filter from
/// warnings-only to info-level, which is what actually surfaces `report_params`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose { "info" } else { "warn" };
    let subscriber = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::new(filter)).with_target(false).without_time().finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Prints the chosen/validated scrypt parameters, per `-v` (S3).
pub fn report_params(params: ChosenParams) {
    info!(N = params.n(), r = params.r, p = params.p, "scrypt parameters");
}

/// Prints `info` mode's header summary (S2), unconditionally.
pub fn print_info(params: ChosenParams) {
    println!("N = {}", params.n());
    println!("r = {}", params.r);
    println!("p = {}", params.p);
}

/// Prints the plain success line after encrypt/decrypt.
pub fn print_success(action: &str, input: &Path, output: &Path) {
    println!("{APP_NAME}: {} {} -> {}", action, input.display(), output.display());
}
