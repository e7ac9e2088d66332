//! On-disk vault format: versioning, atomic writes, base64 fields.
//!
//! A vault file is a single pretty-printed JSON document:
//!
//! ```text
//! {
//!   "kdf":        {"N": 32768, "r": 8, "p": 1, "keyLen": 32},
//!   "salt":       "<base64>",
//!   "keyManager": {"wrappedKeyCiphertext": "<base64>", "wrapNonce": "<base64>"},
//!   "verifyNonce":      "<base64>",
//!   "verifyCiphertext": "<base64>",
//!   "entries":    {"<id>": {"id", "title", "nonce", "ciphertext", "createdAt", "modifiedAt"}},
//!   "version":    2
//! }
//! ```
//!
//! The `version` field is checked before anything else in the document
//! is interpreted, so an unknown layout is never half-parsed.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PwVaultError, Result};

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Vault format versions this build understands.
///
/// Each variant selects how entry ciphertexts are keyed.  Version 1
/// (entries encrypted directly under the password-derived key) is not
/// supported; such files are rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FormatVersion {
    /// Random master key wrapped under the password key; per-entry
    /// HKDF subkeys of the master key.
    V2,
}

/// Version written by `Vault::save`.
pub const CURRENT_VERSION: FormatVersion = FormatVersion::V2;

impl From<FormatVersion> for u32 {
    fn from(version: FormatVersion) -> Self {
        match version {
            FormatVersion::V2 => 2,
        }
    }
}

impl TryFrom<u32> for FormatVersion {
    type Error = PwVaultError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            2 => Ok(FormatVersion::V2),
            other => Err(PwVaultError::UnsupportedVersion(other)),
        }
    }
}

/// Only the version field, read ahead of the full document.
#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

/// Read and validate the `version` field of a serialized vault.
pub fn check_version(data: &[u8]) -> Result<FormatVersion> {
    let probe: VersionProbe = serde_json::from_slice(data)
        .map_err(|e| PwVaultError::InvalidVaultFormat(format!("vault JSON: {e}")))?;

    match probe.version {
        Some(v) => FormatVersion::try_from(v),
        None => Err(PwVaultError::InvalidVaultFormat(
            "missing version field".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// File IO
// ---------------------------------------------------------------------------

/// Read a whole vault file into memory.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(PwVaultError::VaultNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

/// Write `data` to `path` **atomically**.
///
/// 1. Write to a temp file in the same directory (mode 0600 on Unix).
/// 2. Flush it to disk.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    // The temp file is in the same directory so rename is guaranteed
    // to be atomic on the same filesystem.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    if let Err(e) = write_private(&tmp_path, data) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Create (or truncate) a file readable only by its owner.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
