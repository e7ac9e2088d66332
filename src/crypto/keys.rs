//! Master key handling and HKDF-SHA256 subkey derivation.
//!
//! The master key is random, not password-derived.  Everything that
//! encrypts records derives a purpose-specific subkey from it:
//!
//! ```text
//! entry_key = HKDF-SHA256(ikm = master_key, salt = entry_id, info = "entry-key")
//! ```
//!
//! HKDF is fast, so it must only ever see high-entropy input.  Human
//! passwords go through [`super::kdf::password_harden`] instead.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use super::random::random_array;
use crate::errors::{PwVaultError, Result};

/// Length of the master key and of entry keys (256 bits).
pub const KEY_LEN: usize = 32;

/// HKDF `info` label for per-entry encryption keys.
const ENTRY_KEY_LABEL: &[u8] = b"entry-key";

/// Derive `len` bytes from a high-entropy `secret`.
///
/// `context` is used as the HKDF salt and `label` as the `info` string,
/// so different contexts or purposes yield independent keys.
pub fn derive_subkey(
    secret: &[u8],
    context: &[u8],
    label: &[u8],
    len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if secret.is_empty() {
        return Err(PwVaultError::InvalidInput(
            "subkey derivation needs a non-empty secret".into(),
        ));
    }
    if len == 0 {
        return Err(PwVaultError::InvalidInput(
            "subkey length must be greater than 0".into(),
        ));
    }

    let hk = Hkdf::<Sha256>::new(Some(context), secret);

    let mut okm = Zeroizing::new(vec![0u8; len]);
    hk.expand(label, okm.as_mut_slice())
        .map_err(|e| PwVaultError::InvalidInput(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// Derive the encryption key for the entry with the given id.
///
/// Deterministic from `{master_key, entry_id}` alone, so nothing
/// per-entry besides the id needs to be stored.
pub fn derive_entry_key(master_key: &[u8], entry_id: &str) -> Result<Zeroizing<Vec<u8>>> {
    derive_subkey(master_key, entry_id.as_bytes(), ENTRY_KEY_LABEL, KEY_LEN)
}

/// A 32-byte master key that zeroes its memory when dropped.
///
/// Held by the caller's session between unlock and exit.  It is never
/// serialized; only its wrapped form reaches the disk.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random master key.
    pub fn generate() -> Result<Self> {
        let mut bytes: [u8; KEY_LEN] = random_array()?;
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Build a key from a slice that must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut buf: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            PwVaultError::InvalidInput(format!(
                "master key must be {KEY_LEN} bytes (got {})",
                bytes.len()
            ))
        })?;
        let key = Self::new(buf);
        buf.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes (e.g. to pass to HKDF or encryption).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the encryption key for one entry.
    pub fn derive_entry_key(&self, entry_id: &str) -> Result<Zeroizing<Vec<u8>>> {
        derive_entry_key(&self.bytes, entry_id)
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
