//! The error taxonomy surfaced at the library boundary.
//!
//! Every failure this crate's core (tuner, resource probe, header codec, stream
//! codec, session orchestrator) can produce is one of the kinds below. The CLI
//! layer wraps these in `anyhow::Context` for user-facing messages, but keeps
//! matching on `ScryptError` where behavior depends on the kind (e.g. re-prompting
//! on `Passphrase`, deleting a truncated output file only for some kinds and not others).

use std::io;

use thiserror::Error;

/// The complete set of error kinds this crate can produce at its public boundary.
#[derive(Debug, Error)]
pub enum ScryptError {
    /// `ELIMIT` — cannot determine available memory.
    #[error("cannot determine available memory")]
    MemoryLimit,

    /// `ECLOCK` — cannot benchmark scrypt to estimate throughput.
    #[error("cannot benchmark scrypt throughput")]
    Clock,

    /// `EKEY` — scrypt key derivation failed internally.
    #[error("key derivation failed")]
    Key,

    /// `ESALT` — cannot read a random salt.
    #[error("cannot generate random salt")]
    Salt,

    /// `ENOMEM` — an allocation (typically scrypt's scratch buffer) failed.
    #[error("out of memory")]
    NoMemory,

    /// `EINVAL` — header not recognized, or final tag mismatch (corruption/truncation).
    #[error("{0}")]
    Invalid(&'static str),

    /// `EVERSION` — header version is not one this implementation understands.
    #[error("unsupported header version")]
    Version,

    /// `ETOOBIG` — decrypting this file would exceed the memory cap.
    #[error("decryption would require too much memory (use -f to override)")]
    TooBig,

    /// `ETOOSLOW` — decrypting this file would exceed the time cap.
    #[error("decryption would take too long (use -f to override)")]
    TooSlow,

    /// `EPASS` — header HMAC did not verify; the passphrase is wrong.
    #[error("passphrase is incorrect")]
    Passphrase,

    /// `EPARAM` — explicit parameters are infeasible under the current budget.
    #[error("{0}")]
    Param(String),

    /// `ERDFILE` — a read from the input stream failed.
    #[error("error reading input")]
    ReadFile(#[source] io::Error),

    /// `EWRFILE` — a write to the output stream failed.
    #[error("error writing output")]
    WriteFile(#[source] io::Error),
}

impl ScryptError {
    /// The short code this crate's documentation and tests refer to each kind by.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MemoryLimit => "ELIMIT",
            Self::Clock => "ECLOCK",
            Self::Key => "EKEY",
            Self::Salt => "ESALT",
            Self::NoMemory => "ENOMEM",
            Self::Invalid(_) => "EINVAL",
            Self::Version => "EVERSION",
            Self::TooBig => "ETOOBIG",
            Self::TooSlow => "ETOOSLOW",
            Self::Passphrase => "EPASS",
            Self::Param(_) => "EPARAM",
            Self::ReadFile(_) => "ERDFILE",
            Self::WriteFile(_) => "EWRFILE",
        }
    }
}
