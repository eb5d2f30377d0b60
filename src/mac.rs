//! HMAC-SHA256 message authentication.
//!
//! One [`Mac`] instance backs both integrity tags in the container format: the
//! header tag (computed once, over the 64-byte header prefix) and the running
//! tag over the whole ciphertext body (fed incrementally, chunk by chunk, so
//! the whole body is never buffered in memory). Both verifications use
//! constant-time comparison — a secret-dependent timing difference here would
//! leak information about the correct passphrase.
//!
//! `hmac` and `sha2` are both built with their `zeroize` feature, so the
//! ipad/opad state inside `HmacSha256` is wiped when a `Mac` (or a
//! `DecryptCookie` holding one) is dropped, without `Mac` needing its own
//! `Drop` impl.

use hmac::{Hmac, Mac as _};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::FINAL_TAG_LEN;
use crate::error::ScryptError;

type HmacSha256 = Hmac<Sha256>;

/// An incrementally-updatable HMAC-SHA256 context.
pub struct Mac {
    inner: HmacSha256,
}

impl Mac {
    /// Creates a new MAC context keyed by `key`.
    ///
    /// HMAC accepts keys of any length, so this never fails in practice for the
    /// 32-byte `hmac_key` this crate always passes in; the `Result` exists because
    /// the underlying crate's constructor is fallible in general.
    pub fn new(key: &[u8]) -> Result<Self, ScryptError> {
        let inner = HmacSha256::new_from_slice(key).map_err(|_| ScryptError::Key)?;
        Ok(Self { inner })
    }

    /// Feeds more authenticated data into the running MAC.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalizes the MAC, consuming the context.
    pub fn finalize(self) -> [u8; FINAL_TAG_LEN] {
        self.inner.finalize().into_bytes().into()
    }

    /// Finalizes the MAC and compares it against `expected` in constant time.
    pub fn verify(self, expected: &[u8]) -> Result<(), ScryptError> {
        if expected.len() != FINAL_TAG_LEN {
            return Err(ScryptError::Invalid("tag has wrong length"));
        }
        let computed = self.finalize();
        if bool::from(computed.ct_eq(expected)) {
            Ok(())
        } else {
            Err(ScryptError::Invalid("tag mismatch"))
        }
    }
}

/// Computes an HMAC-SHA256 over the concatenation of `parts` without actually
/// concatenating them in memory. Used for the one-shot header tag.
pub fn compute(key: &[u8], parts: &[&[u8]]) -> Result<[u8; FINAL_TAG_LEN], ScryptError> {
    let mut mac = Mac::new(key)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize())
}

/// Computes an HMAC-SHA256 over `parts` and compares it to `expected` in constant time.
pub fn verify(key: &[u8], expected: &[u8], parts: &[&[u8]]) -> Result<(), ScryptError> {
    if expected.len() != FINAL_TAG_LEN {
        return Err(ScryptError::Invalid("tag has wrong length"));
    }
    let computed = compute(key, parts)?;
    if bool::from(computed.ct_eq(expected)) {
        Ok(())
    } else {
        Err(ScryptError::Passphrase)
    }
}
