//! AES-256-CTR stream cipher wrapper.
//!
//! Counter mode with a fixed all-zero 128-bit counter: the key is never reused
//! across files (a fresh salt means a fresh `enc_key` every time), so a
//! constant counter is safe here and lets the format avoid storing a nonce —
//! the whole-file HMAC (see `mac.rs`) is what actually authenticates the data,
//! not the cipher mode.

use aes::Aes256;
use aes::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;

use crate::config::SUBKEY_LEN;
use crate::error::ScryptError;

type Aes256Ctr = Ctr128BE<Aes256>;

/// A positioned AES-256-CTR keystream generator.
///
/// Every call to [`Keystream::apply`] advances the internal counter by the
/// number of bytes processed, so chunked encrypt/decrypt never introduces a
/// gap or overlap in the keystream regardless of chunk boundaries.
pub struct Keystream {
    inner: Aes256Ctr,
}

impl Keystream {
    /// Creates a keystream generator keyed by `enc_key`, counter reset to zero.
    pub fn new(enc_key: &[u8]) -> Result<Self, ScryptError> {
        if enc_key.len() != SUBKEY_LEN {
            return Err(ScryptError::Key);
        }
        let zero_iv = [0u8; 16];
        let inner = Aes256Ctr::new_from_slices(enc_key, &zero_iv).map_err(|_| ScryptError::Key)?;
        Ok(Self { inner })
    }

    /// XORs the keystream into `buf` in place, advancing the counter.
    pub fn apply(&mut self, buf: &mut [u8]) {
        self.inner.apply_keystream(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_twice_is_identity() {
        let key = [0x11u8; SUBKEY_LEN];
        let plaintext = b"the quick brown fox jumps over the lazy dog".to_vec();

        let mut ciphertext = plaintext.clone();
        Keystream::new(&key).unwrap().apply(&mut ciphertext);
        assert_ne!(ciphertext, plaintext);

        let mut roundtrip = ciphertext.clone();
        Keystream::new(&key).unwrap().apply(&mut roundtrip);
        assert_eq!(roundtrip, plaintext);
    }

    #[test]
    fn chunked_application_matches_single_shot() {
        let key = [0x22u8; SUBKEY_LEN];
        let plaintext: Vec<u8> = (0u8..=255).collect();

        let mut whole = plaintext.clone();
        Keystream::new(&key).unwrap().apply(&mut whole);

        let mut chunked = plaintext.clone();
        let mut ks = Keystream::new(&key).unwrap();
        for chunk in chunked.chunks_mut(7) {
            ks.apply(chunk);
        }

        assert_eq!(whole, chunked);
    }

    #[test]
    fn rejects_wrong_key_length() {
        assert!(Keystream::new(&[0u8; 10]).is_err());
    }
}
