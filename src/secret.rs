//! Zero-on-drop wrappers for passphrase-derived secrets.
//!
//! The passphrase, the two scrypt-derived subkeys, and the running HMAC key
//! all pass through one of the two wrappers here so that the "secrets are
//! zeroed before their backing storage is released" invariant (see the data
//! model in SPEC_FULL.md) holds structurally rather than by convention.

use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;

use secrecy::{ExposeSecret, SecretBox};
use zeroize::Zeroize;

/// A value that is zeroized when dropped.
///
/// Used for secrets that are not already byte buffers (e.g. the 64-byte
/// scrypt output before it is split into `enc_key`/`hmac_key`), where
/// `SecretBytes` below would require an extra heap allocation.
pub struct Protected<T>
where
    T: Zeroize,
{
    data: T,
}

impl<T> Protected<T>
where
    T: Zeroize,
{
    pub fn new(value: T) -> Self {
        Self { data: value }
    }

    pub fn expose(&self) -> &T {
        &self.data
    }

    pub fn expose_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

impl<T> Deref for Protected<T>
where
    T: Zeroize,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> Drop for Protected<T>
where
    T: Zeroize,
{
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl<T> Debug for Protected<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// A heap-allocated secret byte buffer, zeroized on drop via `secrecy::SecretBox`.
///
/// Used for the passphrase itself and for each of the two derived subkeys.
pub struct SecretBytes {
    inner: SecretBox<Vec<u8>>,
}

impl SecretBytes {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { inner: SecretBox::new(Box::new(data)) }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
