//! The `Vault` aggregate: lifecycle, entry CRUD, search and persistence.
//!
//! A `Vault` never holds plaintext key material.  `create` and `unlock`
//! hand the `MasterKey` to the caller, who passes it back into every
//! operation that touches ciphertext:
//!
//! ```text
//! let (mut vault, key) = Vault::create(b"hunter2")?;
//! let id = vault.add_entry(&key, fields)?;
//! vault.save(path)?;
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::entry::{
    self, CipherEntry, EntryFields, EntryMetadata, EntryUpdate, PlainEntry,
};
use super::format::{self, base64_decode, base64_encode, FormatVersion, CURRENT_VERSION};
use super::keymanager::{self, WrappedKey};
use crate::crypto::aead::{self, NONCE_LEN};
use crate::crypto::kdf::{generate_salt, password_harden, KdfParams, MIN_SALT_LEN};
use crate::crypto::keys::MasterKey;
use crate::errors::{PwVaultError, Result};

/// Known plaintext encrypted under the password-derived key.
const VERIFY_MARKER: &[u8] = b"vault-check";

/// A password vault.  Create one with `Vault::create` or `Vault::load`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    /// scrypt parameters for this password generation.
    kdf: KdfParams,

    /// Shared by password verification and master-key wrapping.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    salt: Vec<u8>,

    /// The master key, wrapped under the password-derived key.
    key_manager: WrappedKey,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    verify_nonce: Vec<u8>,

    /// `VERIFY_MARKER` sealed under the password-derived key.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    verify_ciphertext: Vec<u8>,

    /// Entry id -> encrypted entry.  Ordered for deterministic output.
    #[serde(default, deserialize_with = "entries_or_null")]
    entries: BTreeMap<String, CipherEntry>,

    version: FormatVersion,
}

impl Vault {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create an empty vault protected by `password`, using the default
    /// scrypt parameters.
    ///
    /// Returns the vault together with its freshly generated master key.
    /// Nothing is written to disk until `save` is called.
    pub fn create(password: &[u8]) -> Result<(Self, MasterKey)> {
        Self::create_with_params(password, KdfParams::default())
    }

    /// Create an empty vault with explicit scrypt parameters.
    pub fn create_with_params(password: &[u8], params: KdfParams) -> Result<(Self, MasterKey)> {
        validate_vault_kdf(&params)?;
        require_password(password)?;

        let salt = generate_salt()?;
        let master_key = MasterKey::generate()?;

        // One scrypt run serves both the wrap and the verification blob.
        let password_key = password_harden(password, &salt, &params)?;
        let key_manager = keymanager::wrap_with_key(&master_key, &password_key)?;
        let (verify_nonce, verify_ciphertext) = build_verification(&password_key)?;

        let vault = Self {
            kdf: params,
            salt: salt.to_vec(),
            key_manager,
            verify_nonce,
            verify_ciphertext,
            entries: BTreeMap::new(),
            version: CURRENT_VERSION,
        };

        tracing::debug!(n = params.n, r = params.r, p = params.p, "vault created");
        Ok((vault, master_key))
    }

    /// Check `password` and recover the master key.
    ///
    /// Two independent checks must pass: the verification blob must
    /// decrypt to the marker, and the wrapped master key must
    /// authenticate.  Either failing yields the same
    /// [`PwVaultError::AuthenticationFailed`].
    pub fn unlock(&self, password: &[u8]) -> Result<MasterKey> {
        let password_key = password_harden(password, &self.salt, &self.kdf)?;

        let marker_ok = match aead::open(
            &password_key,
            &self.verify_nonce,
            &self.verify_ciphertext,
            &[],
        ) {
            Ok(plaintext) => bool::from(plaintext.as_slice().ct_eq(VERIFY_MARKER)),
            Err(_) => false,
        };
        if !marker_ok {
            return Err(PwVaultError::AuthenticationFailed);
        }

        keymanager::unwrap_with_key(&self.key_manager, &password_key)
            .map_err(|_| PwVaultError::AuthenticationFailed)
    }

    /// Re-protect the vault under `new_password`, keeping the same
    /// master key and scrypt parameters.
    ///
    /// Entries are untouched: their keys derive from the master key,
    /// which does not change.
    pub fn change_password(&mut self, old_password: &[u8], new_password: &[u8]) -> Result<()> {
        let params = self.kdf;
        self.change_password_with_params(old_password, new_password, params)
    }

    /// Like `change_password`, but also moves the vault to new scrypt
    /// parameters.  On any error the vault is left unchanged.
    pub fn change_password_with_params(
        &mut self,
        old_password: &[u8],
        new_password: &[u8],
        params: KdfParams,
    ) -> Result<()> {
        validate_vault_kdf(&params)?;
        require_password(new_password)?;

        let master_key = self.unlock(old_password)?;
        self.rewrap(&master_key, new_password, params)
    }

    /// Re-protect the vault under `new_password` with a master key the
    /// caller already recovered through `unlock`, skipping the second
    /// scrypt run on the old password.
    ///
    /// If the vault has entries, the key must open one of them; otherwise
    /// `AuthenticationFailed` is returned and the vault is left unchanged.
    pub fn change_password_unlocked(
        &mut self,
        master_key: &MasterKey,
        new_password: &[u8],
        params: KdfParams,
    ) -> Result<()> {
        validate_vault_kdf(&params)?;
        require_password(new_password)?;

        if let Some(sample) = self.entries.values().next() {
            entry::open_entry(self.version, master_key, sample)?;
        }
        self.rewrap(master_key, new_password, params)
    }

    fn rewrap(
        &mut self,
        master_key: &MasterKey,
        new_password: &[u8],
        params: KdfParams,
    ) -> Result<()> {
        let salt = generate_salt()?;
        let password_key = password_harden(new_password, &salt, &params)?;
        let key_manager = keymanager::wrap_with_key(master_key, &password_key)?;
        let (verify_nonce, verify_ciphertext) = build_verification(&password_key)?;

        self.kdf = params;
        self.salt = salt.to_vec();
        self.key_manager = key_manager;
        self.verify_nonce = verify_nonce;
        self.verify_ciphertext = verify_ciphertext;

        tracing::debug!(entries = self.entries.len(), "master password changed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Encrypt and store a new entry.  Returns its id.
    pub fn add_entry(&mut self, master_key: &MasterKey, fields: EntryFields) -> Result<String> {
        let EntryFields {
            title,
            username,
            password,
            url,
            notes,
        } = fields;
        validate_title(&title)?;

        let mut id = entry::generate_entry_id()?;
        while self.entries.contains_key(&id) {
            id = entry::generate_entry_id()?;
        }

        let now = Utc::now();
        let plain = PlainEntry {
            username,
            password,
            url,
            notes,
            created_at: now,
            modified_at: now,
        };

        let (nonce, ciphertext) = entry::seal_entry(self.version, master_key, &id, &plain)?;

        self.entries.insert(
            id.clone(),
            CipherEntry {
                id: id.clone(),
                title,
                nonce,
                ciphertext,
                created_at: now,
                modified_at: now,
            },
        );

        tracing::debug!(entry_id = %id, "entry added");
        Ok(id)
    }

    /// Decrypt an entry.  Returns the plaintext and its stored wrapper.
    pub fn get_decrypted(
        &self,
        master_key: &MasterKey,
        id: &str,
    ) -> Result<(PlainEntry, &CipherEntry)> {
        let cipher = self
            .entries
            .get(id)
            .ok_or_else(|| PwVaultError::EntryNotFound(id.to_string()))?;

        let plain = entry::open_entry(self.version, master_key, cipher)?;
        Ok((plain, cipher))
    }

    /// Decrypt, apply `update`, and re-encrypt under a fresh nonce.
    ///
    /// `created_at` is preserved; `modified_at` moves on both the
    /// plaintext and the wrapper.
    pub fn update_entry(
        &mut self,
        master_key: &MasterKey,
        id: &str,
        update: EntryUpdate,
    ) -> Result<()> {
        let current = self
            .entries
            .get(id)
            .ok_or_else(|| PwVaultError::EntryNotFound(id.to_string()))?;

        if let Some(title) = &update.title {
            validate_title(title)?;
        }

        let mut plain = entry::open_entry(self.version, master_key, current)?;
        let title = update.title.unwrap_or_else(|| current.title.clone());
        let created_at = current.created_at;

        if let Some(v) = update.username {
            replace_secret(&mut plain.username, v);
        }
        if let Some(v) = update.password {
            replace_secret(&mut plain.password, v);
        }
        if let Some(v) = update.url {
            replace_secret(&mut plain.url, v);
        }
        if let Some(v) = update.notes {
            replace_secret(&mut plain.notes, v);
        }

        let now = Utc::now();
        plain.modified_at = now;

        let (nonce, ciphertext) = entry::seal_entry(self.version, master_key, id, &plain)?;

        self.entries.insert(
            id.to_string(),
            CipherEntry {
                id: id.to_string(),
                title,
                nonce,
                ciphertext,
                created_at,
                modified_at: now,
            },
        );

        tracing::debug!(entry_id = %id, "entry updated");
        Ok(())
    }

    /// Remove an entry.  Returns `true` iff it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if removed {
            tracing::debug!(entry_id = %id, "entry deleted");
        }
        removed
    }

    // ------------------------------------------------------------------
    // Listing and search (no decryption)
    // ------------------------------------------------------------------

    /// Metadata for every entry, sorted by title (case-insensitive),
    /// then id.
    pub fn list(&self) -> Vec<EntryMetadata> {
        let mut list: Vec<EntryMetadata> = self.entries.values().map(EntryMetadata::from).collect();
        list.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }

    /// Entries whose title contains `query`, ignoring case.
    ///
    /// Most recently modified first.  A blank query matches nothing.
    pub fn search_titles(&self, query: &str) -> Vec<EntryMetadata> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.collect_sorted(|title| title.contains(&needle))
    }

    /// Entries whose title equals `title`, ignoring case.
    ///
    /// Most recently modified first.  A blank title matches nothing.
    pub fn find_by_exact_title(&self, title: &str) -> Vec<EntryMetadata> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.collect_sorted(|t| t == wanted)
    }

    fn collect_sorted(&self, matches: impl Fn(&str) -> bool) -> Vec<EntryMetadata> {
        let mut out: Vec<EntryMetadata> = self
            .entries
            .values()
            .filter(|e| matches(&e.title.to_lowercase()))
            .map(EntryMetadata::from)
            .collect();
        out.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the vault and write it to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| PwVaultError::SerializationError(format!("vault: {e}")))?;
        format::write_atomic(path, &data)?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "vault saved");
        Ok(())
    }

    /// Read a vault file, rejecting unknown versions and malformed data.
    ///
    /// Either the whole vault loads or an error is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let data = format::read_file(path)?;

        let version = format::check_version(&data).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "rejected vault file");
        })?;

        let vault: Vault = serde_json::from_slice(&data)
            .map_err(|e| PwVaultError::InvalidVaultFormat(format!("vault JSON: {e}")))?;
        debug_assert_eq!(vault.version, version);

        vault.validate_structure().inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "rejected vault file");
        })?;

        tracing::debug!(path = %path.display(), entries = vault.entries.len(), "vault loaded");
        Ok(vault)
    }

    /// Structural checks that serde alone cannot express.
    fn validate_structure(&self) -> Result<()> {
        validate_vault_kdf(&self.kdf)
            .map_err(|e| PwVaultError::InvalidVaultFormat(format!("kdf params: {e}")))?;

        if self.salt.len() < MIN_SALT_LEN {
            return Err(PwVaultError::InvalidVaultFormat(format!(
                "salt must be at least {MIN_SALT_LEN} bytes (got {})",
                self.salt.len()
            )));
        }
        if self.key_manager.nonce.len() != NONCE_LEN {
            return Err(PwVaultError::InvalidVaultFormat(
                "wrap nonce must be 12 bytes".into(),
            ));
        }
        if self.verify_nonce.len() != NONCE_LEN {
            return Err(PwVaultError::InvalidVaultFormat(
                "verify nonce must be 12 bytes".into(),
            ));
        }

        for (key, entry) in &self.entries {
            if key != &entry.id {
                return Err(PwVaultError::InvalidVaultFormat(format!(
                    "entry stored under '{key}' has id '{}'",
                    entry.id
                )));
            }
            if entry.nonce.len() != NONCE_LEN {
                return Err(PwVaultError::InvalidVaultFormat(format!(
                    "entry '{key}' nonce must be 12 bytes"
                )));
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the number of entries in the vault.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the vault has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry with this id exists (no decryption).
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The stored wrapper for an entry, if present.
    pub fn entry(&self, id: &str) -> Option<&CipherEntry> {
        self.entries.get(id)
    }

    /// The scrypt parameters of the current password generation.
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// The format version this vault was loaded or created with.
    pub fn version(&self) -> FormatVersion {
        self.version
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seal the verification marker under the password-derived key.
fn build_verification(password_key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let nonce = aead::generate_nonce()?;
    let ciphertext = aead::seal(password_key, &nonce, VERIFY_MARKER, &[])?;
    Ok((nonce.to_vec(), ciphertext))
}

/// The password-derived key is used directly as an AES key, so on top of
/// the scrypt invariants its length must be an AES key size.
fn validate_vault_kdf(params: &KdfParams) -> Result<()> {
    params.validate()?;
    if !matches!(params.key_len, 16 | 24 | 32) {
        return Err(PwVaultError::KeyDerivationFailed(format!(
            "keyLen must be 16, 24 or 32 for a vault (got {})",
            params.key_len
        )));
    }
    Ok(())
}

/// Files written by older tools store an empty entry map as `null`.
fn entries_or_null<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, CipherEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

fn require_password(password: &[u8]) -> Result<()> {
    if password.is_empty() {
        return Err(PwVaultError::InvalidInput(
            "master password cannot be empty".into(),
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PwVaultError::InvalidInput(
            "entry title cannot be empty".into(),
        ));
    }
    Ok(())
}

/// Overwrite a secret string, wiping the old contents first.
fn replace_secret(slot: &mut String, value: String) {
    slot.zeroize();
    *slot = value;
}
