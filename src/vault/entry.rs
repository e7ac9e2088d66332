//! Entry types and the entry codec.
//!
//! Each record is stored as a [`CipherEntry`]: a clear-text title (so
//! the vault can be listed and searched while locked) plus the AES-GCM
//! encryption of a JSON-serialized [`PlainEntry`].
//!
//! Binding discipline:
//! - key = HKDF(master_key, salt = entry id, info = "entry-key")
//! - associated data = entry id bytes
//!
//! A ciphertext copied into another entry's slot therefore fails to
//! decrypt, even under the correct master key.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::format::{base64_decode, base64_encode, FormatVersion};
use crate::crypto::aead;
use crate::crypto::keys::MasterKey;
use crate::crypto::random::random_array;
use crate::errors::{PwVaultError, Result};

/// Number of random bytes in an entry id.
const ENTRY_ID_BYTES: usize = 16;

/// A single encrypted record as stored in the vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CipherEntry {
    /// Random URL-safe id, immutable once assigned.
    pub id: String,

    /// Kept in clear text for listing and search.
    pub title: String,

    /// The 12-byte AES-GCM nonce.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    /// AES-GCM output over the serialized `PlainEntry` (includes the tag).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// The decrypted content of an entry.
///
/// Only ever exists in memory and is wiped when dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct PlainEntry {
    pub username: String,
    pub password: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    #[zeroize(skip)]
    pub modified_at: DateTime<Utc>,
}

impl fmt::Debug for PlainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainEntry")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("notes", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("modified_at", &self.modified_at)
            .finish()
    }
}

/// Field values for a new entry.
#[derive(Clone, Default)]
pub struct EntryFields {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
}

/// A partial update: `None` leaves the field unchanged.
#[derive(Clone, Default)]
pub struct EntryUpdate {
    pub title: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl EntryUpdate {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.url.is_none()
            && self.notes.is_none()
    }
}

/// Lightweight metadata about an entry (no ciphertext).
///
/// Returned by listing and search so callers can display entries
/// without unlocking the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&CipherEntry> for EntryMetadata {
    fn from(entry: &CipherEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            created_at: entry.created_at,
            modified_at: entry.modified_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Generate a fresh entry id: 16 random bytes, base64url without padding.
pub(crate) fn generate_entry_id() -> Result<String> {
    let bytes: [u8; ENTRY_ID_BYTES] = random_array()?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Pick the entry key for the given format version.
fn entry_key(
    version: FormatVersion,
    master_key: &MasterKey,
    id: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    match version {
        FormatVersion::V2 => master_key.derive_entry_key(id),
    }
}

/// Encrypt `plain` for the entry `id`.  Returns `(nonce, ciphertext)`.
pub(crate) fn seal_entry(
    version: FormatVersion,
    master_key: &MasterKey,
    id: &str,
    plain: &PlainEntry,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let blob = Zeroizing::new(
        serde_json::to_vec(plain)
            .map_err(|e| PwVaultError::SerializationError(format!("entry: {e}")))?,
    );

    let key = entry_key(version, master_key, id)?;
    let nonce = aead::generate_nonce()?;
    let ciphertext = aead::seal(&key, &nonce, &blob, id.as_bytes())?;

    Ok((nonce.to_vec(), ciphertext))
}

/// Verify and decrypt `entry`, checking it is bound to its own id.
pub(crate) fn open_entry(
    version: FormatVersion,
    master_key: &MasterKey,
    entry: &CipherEntry,
) -> Result<PlainEntry> {
    let key = entry_key(version, master_key, &entry.id)?;
    let blob = aead::open(&key, &entry.nonce, &entry.ciphertext, entry.id.as_bytes())?;

    // The payload is authentic at this point, so a parse failure means
    // the writer produced garbage.  The serde message is not forwarded
    // because it can quote plaintext.
    serde_json::from_slice(&blob).map_err(|_| {
        PwVaultError::InvalidVaultFormat(format!("entry '{}' has a malformed payload", entry.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plain() -> PlainEntry {
        let now = Utc::now();
        PlainEntry {
            username: "alice".into(),
            password: "S3cret!".into(),
            url: String::new(),
            notes: String::new(),
            created_at: now,
            modified_at: now,
        }
    }

    fn sealed(master: &MasterKey, id: &str) -> CipherEntry {
        let plain = sample_plain();
        let (nonce, ciphertext) = seal_entry(FormatVersion::V2, master, id, &plain).unwrap();
        CipherEntry {
            id: id.to_string(),
            title: "GitHub".into(),
            nonce,
            ciphertext,
            created_at: plain.created_at,
            modified_at: plain.modified_at,
        }
    }

    #[test]
    fn entry_ids_are_url_safe_and_unique() {
        let a = generate_entry_id().unwrap();
        let b = generate_entry_id().unwrap();
        assert_eq!(a.len(), 22);
        assert_ne!(a, b);
        assert!(a
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_'));
    }

    #[test]
    fn seal_open_roundtrip() {
        let master = MasterKey::new([3u8; 32]);
        let entry = sealed(&master, "id-one");
        let plain = open_entry(FormatVersion::V2, &master, &entry).unwrap();
        assert_eq!(plain, sample_plain_with_times(&entry));
    }

    fn sample_plain_with_times(entry: &CipherEntry) -> PlainEntry {
        let mut p = sample_plain();
        p.created_at = entry.created_at;
        p.modified_at = entry.modified_at;
        p
    }

    #[test]
    fn relocated_ciphertext_fails() {
        let master = MasterKey::new([3u8; 32]);
        let mut entry = sealed(&master, "id-one");
        entry.id = "id-two".into();
        assert!(matches!(
            open_entry(FormatVersion::V2, &master, &entry),
            Err(PwVaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn wrong_master_key_fails() {
        let entry = sealed(&MasterKey::new([3u8; 32]), "id-one");
        assert!(open_entry(FormatVersion::V2, &MasterKey::new([4u8; 32]), &entry).is_err());
    }

    #[test]
    fn empty_optional_fields_are_omitted() {
        let json = serde_json::to_value(sample_plain()).unwrap();
        assert!(json.get("url").is_none());
        assert!(json.get("notes").is_none());
        assert_eq!(json["username"], "alice");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn debug_redacts_secrets() {
        let out = format!("{:?}", sample_plain());
        assert!(out.contains("alice"));
        assert!(!out.contains("S3cret!"));
    }

    #[test]
    fn metadata_from_cipher_entry() {
        let entry = sealed(&MasterKey::new([3u8; 32]), "id-one");
        let meta = EntryMetadata::from(&entry);
        assert_eq!(meta.id, "id-one");
        assert_eq!(meta.title, "GitHub");
        assert_eq!(meta.modified_at, entry.modified_at);
    }
}
