// scryptbox - password-based file encryption built on the scrypt KDF.

use std::process;

use scryptbox_rs::cli;

/// Entry point.
///
/// # Exit Codes
/// * 0 - Success
/// * 1 - Error (message printed to stderr)
fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:?}");
        process::exit(1);
    }
}
