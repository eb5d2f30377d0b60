//! Subkey derivation via scrypt.
//!
//! scrypt itself is treated as a black-box dependency (see SPEC_FULL.md §9) —
//! this module only fixes how this crate *uses* it: deriving a single 64-byte
//! block from the passphrase and salt, then splitting it into an encryption
//! subkey and a MAC subkey.

use rand::rand_core::{OsRng, TryRngCore};
use scrypt::Params;

use crate::config::{DERIVED_KEY_LEN, SALT_LEN, SUBKEY_LEN};
use crate::error::ScryptError;
use crate::secret::{Protected, SecretBytes};

/// The two subkeys derived from one scrypt invocation.
pub struct Subkeys {
    /// `enc_key`, bytes `[0, 32)` of the derived block — keys the AES-256-CTR cipher.
    pub enc_key: SecretBytes,
    /// `hmac_key`, bytes `[32, 64)` of the derived block — keys both the header tag and the running MAC.
    pub hmac_key: SecretBytes,
}

/// Derives `enc_key ‖ hmac_key` from `passphrase` and `salt` using scrypt with
/// cost parameters `(N = 2^log_n, r, p)`.
pub fn derive_subkeys(passphrase: &[u8], salt: &[u8], log_n: u8, r: u32, p: u32) -> Result<Subkeys, ScryptError> {
    let params = Params::new(log_n, r, p, DERIVED_KEY_LEN).map_err(|_| ScryptError::Param(format!("infeasible scrypt parameters: logN={log_n}, r={r}, p={p}")))?;

    let mut derived = Protected::new([0u8; DERIVED_KEY_LEN]);
    scrypt::scrypt(passphrase, salt, &params, derived.expose_mut()).map_err(|_| ScryptError::Key)?;

    let (enc_key, hmac_key) = derived.expose().split_at(SUBKEY_LEN);
    let subkeys = Subkeys { enc_key: SecretBytes::from_slice(enc_key), hmac_key: SecretBytes::from_slice(hmac_key) };

    Ok(subkeys)
}

/// Generates a fresh random salt using the operating system's CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN], ScryptError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt).map_err(|_| ScryptError::Salt)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic_for_same_inputs() {
        let salt = [0u8; SALT_LEN];
        let a = derive_subkeys(b"hunter2", &salt, 10, 1, 1).unwrap();
        let b = derive_subkeys(b"hunter2", &salt, 10, 1, 1).unwrap();
        assert_eq!(a.enc_key.expose_secret(), b.enc_key.expose_secret());
        assert_eq!(a.hmac_key.expose_secret(), b.hmac_key.expose_secret());
    }

    #[test]
    fn different_salts_give_different_keys() {
        let a = derive_subkeys(b"hunter2", &[0u8; SALT_LEN], 10, 1, 1).unwrap();
        let b = derive_subkeys(b"hunter2", &[1u8; SALT_LEN], 10, 1, 1).unwrap();
        assert_ne!(a.enc_key.expose_secret(), b.enc_key.expose_secret());
    }

    #[test]
    fn generate_salt_is_random() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn infeasible_params_reject_cleanly() {
        // r * p must stay under scrypt's internal limit; an absurd r triggers it.
        let err = derive_subkeys(b"x", &[0u8; SALT_LEN], 10, u32::MAX, u32::MAX);
        assert!(err.is_err());
    }
}
