//! The 96-byte container header: its binary layout, checksum, and HMAC tag.
//!
//! ```text
//! offset  size  field
//!      0     6  magic "scrypt"
//!      6     1  version
//!      7     1  logN
//!      8     4  r              (big-endian)
//!     12     4  p              (big-endian)
//!     16    32  salt
//!     48    16  header_checksum = SHA-256(bytes[0..48))[0..16]
//!     64    32  header_hmac     = HMAC-SHA256(bytes[0..64), key=hmac_key)
//! ```
//!
//! The checksum is a cheap, unkeyed "is this even a scrypt file" filter,
//! checkable without a passphrase. The HMAC is the real integrity check, but
//! it cannot be verified until subkeys are derived, so `read` and `verify_tag`
//! are deliberately separate steps — this is what lets the session orchestrator
//! validate everything else about a header before it has a passphrase-derived key.

use sha2::{Digest, Sha256};

use crate::config::{
    CURRENT_VERSION, HEADER_CHECKSUM_LEN, HEADER_CHECKSUM_OFFSET, HEADER_HMAC_LEN, HEADER_HMAC_OFFSET, HEADER_LEN, MAGIC, SALT_LEN,
};
use crate::error::ScryptError;
use crate::mac;

/// A parsed (or about-to-be-written) container header.
pub struct Header {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
    pub salt: [u8; SALT_LEN],
    /// The raw HMAC field as read from the stream, or as computed on write.
    /// Unverified until `verify_tag` is called with the derived `hmac_key`.
    hmac_field: [u8; HEADER_HMAC_LEN],
}

impl Header {
    /// Builds a new header for the encrypt path. The HMAC field is a
    /// placeholder until [`Header::write`] computes the real tag.
    pub fn new(log_n: u8, r: u32, p: u32, salt: [u8; SALT_LEN]) -> Self {
        Self { log_n, r, p, salt, hmac_field: [0u8; HEADER_HMAC_LEN] }
    }

    /// `N = 2^logN`.
    pub fn n(&self) -> u64 {
        1u64 << self.log_n
    }

    /// Assembles bytes `[0, 48)`: magic, version, logN, r, p, salt.
    fn prefix(&self) -> [u8; HEADER_CHECKSUM_OFFSET] {
        let mut buf = [0u8; HEADER_CHECKSUM_OFFSET];
        buf[0..6].copy_from_slice(MAGIC);
        buf[6] = CURRENT_VERSION;
        buf[7] = self.log_n;
        buf[8..12].copy_from_slice(&self.r.to_be_bytes());
        buf[12..16].copy_from_slice(&self.p.to_be_bytes());
        buf[16..48].copy_from_slice(&self.salt);
        buf
    }

    /// Serializes the full 96-byte header, computing the checksum and the
    /// HMAC tag (keyed by `hmac_key`) in the process.
    pub fn write(&self, hmac_key: &[u8]) -> Result<[u8; HEADER_LEN], ScryptError> {
        let mut buf = [0u8; HEADER_LEN];
        let prefix = self.prefix();
        buf[0..HEADER_CHECKSUM_OFFSET].copy_from_slice(&prefix);

        let checksum = Sha256::digest(&prefix);
        buf[HEADER_CHECKSUM_OFFSET..HEADER_HMAC_OFFSET].copy_from_slice(&checksum[..HEADER_CHECKSUM_LEN]);

        let tag = mac::compute(hmac_key, &[&buf[0..HEADER_HMAC_OFFSET]])?;
        buf[HEADER_HMAC_OFFSET..HEADER_LEN].copy_from_slice(&tag);

        Ok(buf)
    }

    /// Parses exactly `HEADER_LEN` bytes, checking magic, version, and checksum.
    /// The HMAC field is retained but not verified — call [`Header::verify_tag`]
    /// once subkeys have been derived.
    pub fn read(bytes: &[u8; HEADER_LEN]) -> Result<Self, ScryptError> {
        if &bytes[0..6] != MAGIC {
            return Err(ScryptError::Invalid("not a scrypt file: bad magic"));
        }
        let version = bytes[6];
        if version != CURRENT_VERSION {
            return Err(ScryptError::Version);
        }

        let checksum = Sha256::digest(&bytes[0..HEADER_CHECKSUM_OFFSET]);
        if checksum[..HEADER_CHECKSUM_LEN] != bytes[HEADER_CHECKSUM_OFFSET..HEADER_HMAC_OFFSET] {
            return Err(ScryptError::Invalid("header checksum mismatch"));
        }

        let log_n = bytes[7];
        let r = u32::from_be_bytes(bytes[8..12].try_into().expect("4-byte slice"));
        let p = u32::from_be_bytes(bytes[12..16].try_into().expect("4-byte slice"));
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[16..HEADER_CHECKSUM_OFFSET]);

        let mut hmac_field = [0u8; HEADER_HMAC_LEN];
        hmac_field.copy_from_slice(&bytes[HEADER_HMAC_OFFSET..HEADER_LEN]);

        Ok(Self { log_n, r, p, salt, hmac_field })
    }

    /// Verifies the header HMAC against `hmac_key` in constant time.
    ///
    /// Must only be called after subkey derivation; a mismatch here means the
    /// passphrase was wrong, not that the data is corrupt (the checksum in
    /// `read` already ruled out gross corruption).
    pub fn verify_tag(&self, hmac_key: &[u8]) -> Result<(), ScryptError> {
        let prefix = self.hmac_prefix();
        mac::verify(hmac_key, &self.hmac_field, &[&prefix])
    }

    /// The raw 64-byte prefix (everything but the HMAC field) as it was
    /// actually transmitted, for seeding the running MAC of the stream codec.
    pub fn hmac_prefix(&self) -> [u8; HEADER_HMAC_OFFSET] {
        let mut out = [0u8; HEADER_HMAC_OFFSET];
        out[..HEADER_CHECKSUM_OFFSET].copy_from_slice(&self.prefix());
        let checksum = Sha256::digest(&self.prefix());
        out[HEADER_CHECKSUM_OFFSET..].copy_from_slice(&checksum[..HEADER_CHECKSUM_LEN]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header::new(10, 8, 1, [0x42u8; SALT_LEN])
    }

    #[test]
    fn write_then_read_roundtrips_fields() {
        let header = sample_header();
        let hmac_key = b"hmac key material";
        let bytes = header.write(hmac_key).unwrap();

        let parsed = Header::read(&bytes).unwrap();
        assert_eq!(parsed.log_n, header.log_n);
        assert_eq!(parsed.r, header.r);
        assert_eq!(parsed.p, header.p);
        assert_eq!(parsed.salt, header.salt);
        assert!(parsed.verify_tag(hmac_key).is_ok());
    }

    #[test]
    fn wrong_hmac_key_fails_tag_verification() {
        let header = sample_header();
        let bytes = header.write(b"correct key").unwrap();
        let parsed = Header::read(&bytes).unwrap();
        assert!(parsed.verify_tag(b"wrong key").is_err());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let header = sample_header();
        let mut bytes = header.write(b"key").unwrap();
        bytes[0] ^= 0xFF;
        assert!(matches!(Header::read(&bytes), Err(ScryptError::Invalid(_))));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let header = sample_header();
        let mut bytes = header.write(b"key").unwrap();
        bytes[6] = 99;
        assert!(matches!(Header::read(&bytes), Err(ScryptError::Version)));
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let header = sample_header();
        let mut bytes = header.write(b"key").unwrap();
        bytes[50] ^= 0x01;
        assert!(matches!(Header::read(&bytes), Err(ScryptError::Invalid(_))));
    }

    #[test]
    fn hmac_prefix_matches_what_write_authenticates() {
        let header = sample_header();
        let hmac_key = b"key";
        let bytes = header.write(hmac_key).unwrap();
        assert_eq!(&bytes[0..HEADER_HMAC_OFFSET], &header.hmac_prefix()[..]);
    }
}
