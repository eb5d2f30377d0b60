//! scryptbox - password-based file encryption built on the scrypt KDF.
//!
//! A 96-byte header (magic, version, scrypt cost parameters, salt, checksum,
//! HMAC) precedes an AES-256-CTR ciphertext stream, itself followed by a
//! 32-byte HMAC-SHA256 tag covering the header and every ciphertext byte.
//! See `SPEC_FULL.md` for the full container format and component design.

pub mod allocator;
pub mod cipher;
pub mod cli;
pub mod config;
pub mod error;
pub mod file;
pub mod header;
pub mod kdf;
pub mod mac;
pub mod passphrase;
pub mod resource;
pub mod secret;
pub mod session;
pub mod stream;
pub mod tuner;
pub mod ui;
