//! Passphrase acquisition: `-P`, `--passphrase method:arg`, and the default.
//!
//! Every method reads from the explicit argument supplied on the command
//! line, never from a shared "last seen" variable — see SPEC_FULL.md's
//! resolution of the `--passphrase` parsing ambiguity in DESIGN.md.

use std::env;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail, ensure};
use inquire::Password;
use zeroize::Zeroize;

use crate::config::PASSPHRASE_MIN_LENGTH;
use crate::secret::SecretBytes;

/// A parsed `--passphrase method:arg` (or the `-P` shorthand, or the default).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Method {
    /// `dev:tty-stdin` — the default. Reads from the terminal if one is
    /// attached, else falls back to stdin; asks for confirmation on encrypt.
    TtyStdin,
    /// `dev:stdin-once` — also what `-P` means. Single read from stdin, no confirmation.
    StdinOnce,
    /// `dev:tty-once` — single read from the terminal, no confirmation.
    TtyOnce,
    /// `env:NAME`.
    Env(String),
    /// `file:PATH`.
    File(String),
}

impl Method {
    /// Parses the argument to `--passphrase`. Always reads `method` and `arg`
    /// from the one string the caller passed in, with no fallback to any
    /// other global state.
    pub fn parse(spec: &str) -> Result<Self> {
        match spec.split_once(':') {
            Some(("dev", "tty-stdin")) => Ok(Self::TtyStdin),
            Some(("dev", "stdin-once")) => Ok(Self::StdinOnce),
            Some(("dev", "tty-once")) => Ok(Self::TtyOnce),
            Some(("env", name)) => {
                ensure!(!name.is_empty(), "--passphrase env: requires a variable name");
                Ok(Self::Env(name.to_owned()))
            }
            Some(("file", path)) => {
                ensure!(!path.is_empty(), "--passphrase file: requires a path");
                Ok(Self::File(path.to_owned()))
            }
            _ => bail!("unrecognized --passphrase method: {spec}"),
        }
    }

    /// Whether this method reads from standard input, used to reject the
    /// `infile = "-"` and passphrase-from-stdin conflict (S8).
    pub fn reads_stdin(&self) -> bool {
        match self {
            Self::StdinOnce => true,
            Self::TtyStdin => !io::stdin().is_terminal(),
            Self::TtyOnce | Self::Env(_) | Self::File(_) => false,
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::TtyStdin
    }
}

/// Acquires a passphrase for encryption (confirms, when the method calls for it).
pub fn acquire_for_encrypt(method: &Method) -> Result<SecretBytes> {
    let mut passphrase = acquire(method, true)?;
    if let Err(e) = validate(&passphrase) {
        passphrase.zeroize();
        return Err(e);
    }
    Ok(SecretBytes::from_vec(passphrase))
}

/// Acquires a passphrase for decryption or info (never confirms).
pub fn acquire_for_decrypt(method: &Method) -> Result<SecretBytes> {
    let mut passphrase = acquire(method, false)?;
    if let Err(e) = validate(&passphrase) {
        passphrase.zeroize();
        return Err(e);
    }
    Ok(SecretBytes::from_vec(passphrase))
}

fn validate(passphrase: &[u8]) -> Result<()> {
    ensure!(passphrase.len() >= PASSPHRASE_MIN_LENGTH, "passphrase must not be empty");
    Ok(())
}

fn acquire(method: &Method, confirm: bool) -> Result<Vec<u8>> {
    match method {
        Method::TtyStdin => {
            if io::stdin().is_terminal() {
                read_from_tty(confirm)
            } else {
                read_line_from_stdin()
            }
        }
        Method::StdinOnce => read_line_from_stdin(),
        Method::TtyOnce => read_from_tty(false),
        Method::Env(name) => env::var(name).map(String::into_bytes).with_context(|| format!("environment variable {name} is not set")),
        Method::File(path) => read_first_line_from_file(path),
    }
}

fn read_from_tty(confirm: bool) -> Result<Vec<u8>> {
    let passphrase = Password::new("Passphrase:").without_confirmation().prompt().context("failed to read passphrase from terminal")?;

    if confirm {
        let mut confirmation = Password::new("Confirm passphrase:").without_confirmation().prompt().context("failed to read passphrase confirmation")?;
        let matches = passphrase == confirmation;
        confirmation.zeroize();
        ensure!(matches, "passphrases do not match");
    }

    Ok(passphrase.into_bytes())
}

fn read_line_from_stdin() -> Result<Vec<u8>> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("failed to read passphrase from stdin")?;
    strip_trailing_newline(&mut line);
    Ok(line.into_bytes())
}

fn read_first_line_from_file(path: &str) -> Result<Vec<u8>> {
    let mut contents = fs::read_to_string(path).with_context(|| format!("failed to read passphrase file: {path}"))?;
    let mut first_line = contents.lines().next().unwrap_or_default().to_owned();
    strip_trailing_newline(&mut first_line);
    contents.zeroize();
    Ok(first_line.into_bytes())
}

fn strip_trailing_newline(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Flushes stderr before interactive I/O so prompts aren't interleaved with
/// buffered diagnostics.
pub fn flush_diagnostics() {
    let _ = io::stderr().flush();
}
