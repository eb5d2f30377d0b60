//! Streaming body encrypt/decrypt: AES-256-CTR XOR plus a running HMAC tag.
//!
//! Chunk size is purely an implementation detail (`config::CHUNK_SIZE`); what
//! matters for correctness is that the MAC sees every ciphertext byte exactly
//! once, in stream order, and that the keystream advances without gap or
//! overlap — both of which chunk-at-a-time processing preserves regardless of
//! where the chunk boundaries fall.

use std::io::{Read, Write};

use crate::cipher::Keystream;
use crate::config::{CHUNK_SIZE, FINAL_TAG_LEN};
use crate::error::ScryptError;
use crate::mac::Mac;

/// Encrypts `input` to `output`, writing ciphertext followed by the 32-byte
/// final tag. `mac` must already have absorbed the header bytes.
pub fn encrypt<R: Read, W: Write>(mut input: R, mut output: W, enc_key: &[u8], mut mac: Mac) -> Result<(), ScryptError> {
    let mut keystream = Keystream::new(enc_key)?;
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = input.read(&mut buf).map_err(ScryptError::ReadFile)?;
        if n == 0 {
            break;
        }
        let chunk = &mut buf[..n];
        keystream.apply(chunk);
        mac.update(chunk);
        output.write_all(chunk).map_err(ScryptError::WriteFile)?;
    }

    let tag = mac.finalize();
    output.write_all(&tag).map_err(ScryptError::WriteFile)?;
    output.flush().map_err(ScryptError::WriteFile)?;
    Ok(())
}

/// Decrypts `input` (ciphertext body followed by the 32-byte final tag) to
/// `output`, verifying the tag once the whole body has been consumed. `mac`
/// must already have absorbed the header bytes.
///
/// Since the total stream length isn't known up front, the last `FINAL_TAG_LEN`
/// bytes seen so far are always held back in `pending` rather than treated as
/// body; each new read only confirms as body whatever now lies before that
/// trailing window. At EOF, whatever remains in `pending` is the tag.
pub fn decrypt<R: Read, W: Write>(mut input: R, mut output: W, enc_key: &[u8], mut mac: Mac) -> Result<(), ScryptError> {
    let mut keystream = Keystream::new(enc_key)?;

    let mut pending: Vec<u8> = Vec::with_capacity(CHUNK_SIZE + FINAL_TAG_LEN);
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = input.read(&mut buf).map_err(ScryptError::ReadFile)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&buf[..n]);

        if pending.len() > FINAL_TAG_LEN {
            let body_len = pending.len() - FINAL_TAG_LEN;
            let mut body: Vec<u8> = pending.drain(..body_len).collect();
            mac.update(&body);
            keystream.apply(&mut body);
            output.write_all(&body).map_err(ScryptError::WriteFile)?;
        }
    }

    if pending.len() != FINAL_TAG_LEN {
        return Err(ScryptError::Invalid("ciphertext shorter than the final tag"));
    }

    output.flush().map_err(ScryptError::WriteFile)?;
    mac.verify(&pending)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::SUBKEY_LEN;

    fn roundtrip(plaintext: &[u8]) -> Vec<u8> {
        let enc_key = [0x5Au8; SUBKEY_LEN];
        let hmac_key = [0xA5u8; SUBKEY_LEN];
        let header_prefix = b"fixed-header-bytes-absorbed-by-both-sides";

        let mut ciphertext = Vec::new();
        let mut enc_mac = Mac::new(&hmac_key).unwrap();
        enc_mac.update(header_prefix);
        encrypt(Cursor::new(plaintext), &mut ciphertext, &enc_key, enc_mac).unwrap();

        let mut recovered = Vec::new();
        let mut dec_mac = Mac::new(&hmac_key).unwrap();
        dec_mac.update(header_prefix);
        decrypt(Cursor::new(&ciphertext), &mut recovered, &enc_key, dec_mac).unwrap();

        assert_eq!(recovered, plaintext);
        ciphertext
    }

    #[test]
    fn empty_plaintext_roundtrips_to_exactly_the_tag() {
        let ciphertext = roundtrip(b"");
        assert_eq!(ciphertext.len(), FINAL_TAG_LEN);
    }

    #[test]
    fn small_plaintext_roundtrips() {
        roundtrip(b"hello, world");
    }

    #[test]
    fn plaintext_spanning_multiple_chunks_roundtrips() {
        let plaintext = vec![0x7Eu8; CHUNK_SIZE * 2 + 17];
        roundtrip(&plaintext);
    }

    #[test]
    fn ciphertext_length_is_plaintext_plus_tag() {
        let plaintext = vec![1u8; 12_345];
        let ciphertext = roundtrip(&plaintext);
        assert_eq!(ciphertext.len(), plaintext.len() + FINAL_TAG_LEN);
    }

    #[test]
    fn tampered_body_byte_fails_tag_verification() {
        let enc_key = [0x5Au8; SUBKEY_LEN];
        let hmac_key = [0xA5u8; SUBKEY_LEN];

        let mut ciphertext = Vec::new();
        encrypt(Cursor::new(b"some plaintext data"), &mut ciphertext, &enc_key, Mac::new(&hmac_key).unwrap()).unwrap();
        ciphertext[0] ^= 0x01;

        let mut recovered = Vec::new();
        let result = decrypt(Cursor::new(&ciphertext), &mut recovered, &enc_key, Mac::new(&hmac_key).unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let enc_key = [0x5Au8; SUBKEY_LEN];
        let hmac_key = [0xA5u8; SUBKEY_LEN];

        let mut ciphertext = Vec::new();
        encrypt(Cursor::new(b"some plaintext data"), &mut ciphertext, &enc_key, Mac::new(&hmac_key).unwrap()).unwrap();
        ciphertext.truncate(ciphertext.len() - 5);

        let mut recovered = Vec::new();
        let result = decrypt(Cursor::new(&ciphertext), &mut recovered, &enc_key, Mac::new(&hmac_key).unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn too_short_to_hold_a_tag_is_rejected() {
        let enc_key = [0x5Au8; SUBKEY_LEN];
        let hmac_key = [0xA5u8; SUBKEY_LEN];
        let mut recovered = Vec::new();
        let result = decrypt(Cursor::new(&[0u8; 5]), &mut recovered, &enc_key, Mac::new(&hmac_key).unwrap());
        assert!(result.is_err());
    }
}
