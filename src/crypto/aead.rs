//! AES-GCM authenticated encryption with associated data.
//!
//! Unlike a "nonce-prepended blob" API, the nonce is an explicit input
//! here: the vault format stores nonces in their own fields, and the
//! caller owns the uniqueness guarantee (always pass a fresh value from
//! [`generate_nonce`]).
//!
//! Output layout of [`seal`]:
//!   [ ciphertext (same length as plaintext) | 16-byte auth tag ]

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Payload};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use zeroize::Zeroizing;

use super::random::random_array;
use crate::errors::{PwVaultError, Result};

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// AES-192 in GCM mode (the crate only aliases the 128/256-bit variants).
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Generate a fresh random 12-byte nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    random_array()
}

/// Encrypt and authenticate `plaintext`, also authenticating `aad`.
///
/// `key` must be 16, 24 or 32 bytes; `nonce` must be exactly 12 bytes.
pub fn seal(key: &[u8], nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    validate_nonce(nonce)?;
    let payload = Payload {
        msg: plaintext,
        aad,
    };

    match key.len() {
        16 => seal_with::<Aes128Gcm>(key, nonce, payload),
        24 => seal_with::<Aes192Gcm>(key, nonce, payload),
        32 => seal_with::<Aes256Gcm>(key, nonce, payload),
        n => Err(invalid_key_len(n)),
    }
}

/// Verify and decrypt output of [`seal`].
///
/// Any modification of the ciphertext, tag, nonce or `aad` yields
/// [`PwVaultError::AuthenticationFailed`] and no plaintext at all.
pub fn open(key: &[u8], nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    validate_nonce(nonce)?;

    // Too short to even hold a tag.
    if ciphertext.len() < TAG_LEN {
        return Err(PwVaultError::AuthenticationFailed);
    }

    let payload = Payload {
        msg: ciphertext,
        aad,
    };

    let plaintext = match key.len() {
        16 => open_with::<Aes128Gcm>(key, nonce, payload),
        24 => open_with::<Aes192Gcm>(key, nonce, payload),
        32 => open_with::<Aes256Gcm>(key, nonce, payload),
        n => Err(invalid_key_len(n)),
    }?;

    Ok(Zeroizing::new(plaintext))
}

fn seal_with<C>(key: &[u8], nonce: &[u8], payload: Payload<'_, '_>) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_len(key.len()))?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|e| PwVaultError::EncryptionFailed(format!("AES-GCM seal: {e}")))
}

fn open_with<C>(key: &[u8], nonce: &[u8], payload: Payload<'_, '_>) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_len(key.len()))?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|_| PwVaultError::AuthenticationFailed)
}

fn validate_nonce(nonce: &[u8]) -> Result<()> {
    if nonce.len() != NONCE_LEN {
        return Err(PwVaultError::InvalidInput(format!(
            "nonce must be exactly {NONCE_LEN} bytes (got {})",
            nonce.len()
        )));
    }
    Ok(())
}

fn invalid_key_len(len: usize) -> PwVaultError {
    PwVaultError::InvalidInput(format!("AES-GCM key must be 16, 24 or 32 bytes (got {len})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_appends_tag() {
        let key = [0x11u8; 32];
        let nonce = [0x22u8; NONCE_LEN];
        let ct = seal(&key, &nonce, b"hello", b"").unwrap();
        assert_eq!(ct.len(), 5 + TAG_LEN);
    }

    #[test]
    fn all_key_sizes_roundtrip() {
        let nonce = generate_nonce().unwrap();
        for len in [16usize, 24, 32] {
            let key = vec![0x5Au8; len];
            let ct = seal(&key, &nonce, b"payload", b"aad").unwrap();
            let pt = open(&key, &nonce, &ct, b"aad").unwrap();
            assert_eq!(pt.as_slice(), b"payload");
        }
    }

    #[test]
    fn rejects_bad_key_length_before_crypto() {
        let nonce = [0u8; NONCE_LEN];
        let err = seal(&[0u8; 20], &nonce, b"x", b"").unwrap_err();
        assert!(matches!(err, PwVaultError::InvalidInput(_)));
    }

    #[test]
    fn rejects_bad_nonce_length() {
        let key = [0u8; 32];
        let err = seal(&key, &[0u8; 8], b"x", b"").unwrap_err();
        assert!(matches!(err, PwVaultError::InvalidInput(_)));
        let err = open(&key, &[0u8; 16], &[0u8; 32], b"").unwrap_err();
        assert!(matches!(err, PwVaultError::InvalidInput(_)));
    }

    #[test]
    fn short_ciphertext_is_auth_failure() {
        let key = [0u8; 32];
        let err = open(&key, &[0u8; NONCE_LEN], &[0u8; 10], b"").unwrap_err();
        assert!(matches!(err, PwVaultError::AuthenticationFailed));
    }

    #[test]
    fn aad_mismatch_fails() {
        let key = [0x33u8; 16];
        let nonce = generate_nonce().unwrap();
        let ct = seal(&key, &nonce, b"secret", b"id-1").unwrap();
        let err = open(&key, &nonce, &ct, b"id-2").unwrap_err();
        assert!(matches!(err, PwVaultError::AuthenticationFailed));
    }
}
