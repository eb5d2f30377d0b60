//! Session orchestrator: sequences passphrase → subkeys → header → stream → tag.
//!
//! Decryption is split into two phases so a bad header or wrong passphrase is
//! detected before any output file is created:
//!
//! - [`prep`] reads and validates the header, runs the tuner's decrypt-side
//!   checks, derives subkeys, and verifies the header HMAC. On success it
//!   returns a [`DecryptCookie`]; on any failure nothing is returned and no
//!   output has been written.
//! - [`copy`] consumes the cookie exactly once, streaming the body through
//!   the stream codec and verifying the final tag.
//!
//! Encryption has no such split (there's nothing to reject before the output
//! exists): [`encrypt`] runs tuner → derive → header write → stream encrypt
//! in one pass.

use std::io::{Read, Write};

use crate::config::HEADER_LEN;
use crate::error::ScryptError;
use crate::header::Header;
use crate::kdf::{derive_subkeys, generate_salt};
use crate::mac::Mac;
use crate::secret::SecretBytes;
use crate::stream;
use crate::tuner::{self, Budget};

/// Explicit scrypt parameters, when the caller bypasses auto-selection.
#[derive(Clone, Copy, Debug)]
pub struct ExplicitParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

/// The (logN, r, p) chosen or validated for an encryption, reported back to
/// the caller so `-v` can print it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChosenParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl ChosenParams {
    pub fn n(&self) -> u64 {
        1u64 << self.log_n
    }
}

/// Encrypts `input` to `output` under `passphrase`, returning the parameters
/// that were used (selected or validated) so the caller can print diagnostics.
pub fn encrypt<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    passphrase: &SecretBytes,
    budget: &Budget,
    explicit: Option<ExplicitParams>,
    force: bool,
) -> Result<ChosenParams, ScryptError> {
    let (log_n, r, p) = match explicit {
        Some(params) => {
            tuner::validate_encrypt(budget, params.log_n, params.r, params.p, force)?;
            (params.log_n, params.r, params.p)
        }
        None => tuner::pick_params(budget)?,
    };

    let salt = generate_salt()?;
    let subkeys = derive_subkeys(passphrase.expose_secret(), &salt, log_n, r, p)?;

    let header = Header::new(log_n, r, p, salt);
    let header_bytes = header.write(subkeys.hmac_key.expose_secret())?;
    output.write_all(&header_bytes).map_err(ScryptError::WriteFile)?;

    let mut mac = Mac::new(subkeys.hmac_key.expose_secret())?;
    mac.update(&header_bytes);

    stream::encrypt(&mut input, &mut output, subkeys.enc_key.expose_secret(), mac)?;

    Ok(ChosenParams { log_n, r, p })
}

/// The single-use session state produced by [`prep`] and consumed by [`copy`].
///
/// Holds the derived subkeys and a running MAC already seeded with the header
/// bytes; both are wiped on drop (`enc_key` via `SecretBytes`, `mac` via the
/// `hmac`/`sha2` crates' `zeroize` feature), whether or not `copy` is ever called.
pub struct DecryptCookie {
    enc_key: SecretBytes,
    mac: Mac,
    pub params: ChosenParams,
}

/// Reads and validates a header, runs the tuner's decrypt-side budget checks,
/// derives subkeys, and verifies the header HMAC. Consumes exactly
/// `HEADER_LEN` bytes from `input` on both success and failure.
pub fn prep<R: Read>(mut input: R, passphrase: &SecretBytes, budget: &Budget, force: bool) -> Result<DecryptCookie, ScryptError> {
    let mut header_bytes = [0u8; HEADER_LEN];
    input.read_exact(&mut header_bytes).map_err(ScryptError::ReadFile)?;

    let header = Header::read(&header_bytes)?;
    tuner::validate_decrypt(budget, header.log_n, header.r, header.p, force)?;

    let subkeys = derive_subkeys(passphrase.expose_secret(), &header.salt, header.log_n, header.r, header.p)?;
    header.verify_tag(subkeys.hmac_key.expose_secret())?;

    let mut mac = Mac::new(subkeys.hmac_key.expose_secret())?;
    mac.update(&header_bytes);

    Ok(DecryptCookie {
        enc_key: subkeys.enc_key,
        mac,
        params: ChosenParams { log_n: header.log_n, r: header.r, p: header.p },
    })
}

/// Streams the ciphertext body from `input` to `output`, verifying the final
/// tag. Consumes `cookie`; there is no way to call this twice on the same cookie.
pub fn copy<R: Read, W: Write>(cookie: DecryptCookie, input: R, output: W) -> Result<(), ScryptError> {
    stream::decrypt(input, output, cookie.enc_key.expose_secret(), cookie.mac)
}

/// Reads a header (checking magic/version/checksum only, no passphrase
/// required) and reports its parameters without attempting to decrypt.
pub fn info<R: Read>(mut input: R) -> Result<ChosenParams, ScryptError> {
    let mut header_bytes = [0u8; HEADER_LEN];
    input.read_exact(&mut header_bytes).map_err(ScryptError::ReadFile)?;
    let header = Header::read(&header_bytes)?;
    Ok(ChosenParams { log_n: header.log_n, r: header.r, p: header.p })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn pw(s: &str) -> SecretBytes {
        SecretBytes::from_slice(s.as_bytes())
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let plaintext = b"the once-over-lightly fox";
        let mut ciphertext = Vec::new();
        let params = encrypt(
            Cursor::new(plaintext),
            &mut ciphertext,
            &pw("correct horse battery staple"),
            &Budget::default(),
            Some(ExplicitParams { log_n: 10, r: 1, p: 1 }),
            true,
        )
        .unwrap();
        assert_eq!(params.n(), 1024);

        let cookie = prep(Cursor::new(&ciphertext), &pw("correct horse battery staple"), &Budget::default(), true).unwrap();
        let mut recovered = Vec::new();
        copy(cookie, Cursor::new(&ciphertext[HEADER_LEN..]), &mut recovered).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn empty_plaintext_produces_header_plus_tag_only() {
        let mut ciphertext = Vec::new();
        encrypt(Cursor::new(b""), &mut ciphertext, &pw("pw"), &Budget::default(), Some(ExplicitParams { log_n: 10, r: 1, p: 1 }), true).unwrap();
        assert_eq!(ciphertext.len(), HEADER_LEN + 32);
    }

    #[test]
    fn wrong_passphrase_fails_at_prep_with_epass() {
        let mut ciphertext = Vec::new();
        encrypt(Cursor::new(b"secret"), &mut ciphertext, &pw("right"), &Budget::default(), Some(ExplicitParams { log_n: 10, r: 1, p: 1 }), true).unwrap();

        let result = prep(Cursor::new(&ciphertext), &pw("wrong"), &Budget::default(), true);
        assert!(matches!(result, Err(ScryptError::Passphrase)));
    }

    #[test]
    fn info_reports_header_params_without_passphrase() {
        let mut ciphertext = Vec::new();
        encrypt(Cursor::new(b"x"), &mut ciphertext, &pw("pw"), &Budget::default(), Some(ExplicitParams { log_n: 12, r: 2, p: 3 }), true).unwrap();

        let params = info(Cursor::new(&ciphertext)).unwrap();
        assert_eq!(params.log_n, 12);
        assert_eq!(params.r, 2);
        assert_eq!(params.p, 3);
        assert_eq!(params.n(), 4096);
    }

    #[test]
    fn two_encryptions_of_same_plaintext_differ() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        encrypt(Cursor::new(b"same"), &mut a, &pw("pw"), &Budget::default(), Some(ExplicitParams { log_n: 10, r: 1, p: 1 }), true).unwrap();
        encrypt(Cursor::new(b"same"), &mut b, &pw("pw"), &Budget::default(), Some(ExplicitParams { log_n: 10, r: 1, p: 1 }), true).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn roundtrips_through_real_files_on_disk() {
        use std::fs::File;

        let dir = tempfile::tempdir().unwrap();
        let plain_path = dir.path().join("plain.txt");
        let cipher_path = dir.path().join("plain.txt.scrypt");
        let recovered_path = dir.path().join("recovered.txt");

        std::fs::write(&plain_path, b"contents written to an actual file on disk").unwrap();

        let params = ExplicitParams { log_n: 10, r: 1, p: 1 };
        encrypt(
            File::open(&plain_path).unwrap(),
            File::create(&cipher_path).unwrap(),
            &pw("correct horse battery staple"),
            &Budget::default(),
            Some(params),
            true,
        )
        .unwrap();

        let mut ciphertext_file = File::open(&cipher_path).unwrap();
        let cookie = prep(&mut ciphertext_file, &pw("correct horse battery staple"), &Budget::default(), true).unwrap();
        copy(cookie, ciphertext_file, File::create(&recovered_path).unwrap()).unwrap();

        assert_eq!(std::fs::read(&recovered_path).unwrap(), std::fs::read(&plain_path).unwrap());
    }
}
