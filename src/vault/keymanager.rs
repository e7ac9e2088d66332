//! Wrapping and unwrapping of the vault master key.
//!
//! The master key is encrypted ("wrapped") under a key derived from the
//! master password with scrypt:
//!
//! ```text
//! wrapping_key = scrypt(password, salt, N, r, p)
//! wrapped      = AES-GCM(wrapping_key, fresh_nonce, master_key, aad = "")
//! ```
//!
//! Changing the password only re-wraps this one value; entry keys derive
//! from the master key and stay valid.

use serde::{Deserialize, Serialize};

use super::format::{base64_decode, base64_encode};
use crate::crypto::aead;
use crate::crypto::kdf::{password_harden, KdfParams};
use crate::crypto::keys::MasterKey;
use crate::errors::{PwVaultError, Result};

/// The master key in its persisted, encrypted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKey {
    /// AES-GCM output over the 32 master key bytes (includes the tag).
    #[serde(
        rename = "wrappedKeyCiphertext",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub ciphertext: Vec<u8>,

    /// The 12-byte nonce used for wrapping.
    #[serde(
        rename = "wrapNonce",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode"
    )]
    pub nonce: Vec<u8>,
}

/// Derive the wrapping key from `password` and wrap `master_key` with it.
pub fn wrap_master_key(
    master_key: &MasterKey,
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<WrappedKey> {
    let wrapping_key = password_harden(password, salt, params)?;
    wrap_with_key(master_key, &wrapping_key)
}

/// Re-derive the wrapping key from `password` and recover the master key.
///
/// A wrong password and a corrupted blob both surface as
/// [`PwVaultError::AuthenticationFailed`]; callers cannot tell them apart.
pub fn unwrap_master_key(
    wrapped: &WrappedKey,
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<MasterKey> {
    let wrapping_key = password_harden(password, salt, params)?;
    unwrap_with_key(wrapped, &wrapping_key)
}

/// Wrap `master_key` under an already-derived wrapping key.
pub(crate) fn wrap_with_key(master_key: &MasterKey, wrapping_key: &[u8]) -> Result<WrappedKey> {
    let nonce = aead::generate_nonce()?;
    let ciphertext = aead::seal(wrapping_key, &nonce, master_key.as_bytes(), &[])?;

    Ok(WrappedKey {
        ciphertext,
        nonce: nonce.to_vec(),
    })
}

/// Unwrap with an already-derived wrapping key.
pub(crate) fn unwrap_with_key(wrapped: &WrappedKey, wrapping_key: &[u8]) -> Result<MasterKey> {
    let plaintext = aead::open(wrapping_key, &wrapped.nonce, &wrapped.ciphertext, &[])?;

    // An authentic blob of the wrong size is still not a usable key;
    // report it exactly like any other unwrap failure.
    MasterKey::from_slice(&plaintext).map_err(|_| PwVaultError::AuthenticationFailed)
}
