//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - Master-key wrapping under the password-derived key (`keymanager`)
//! - Entry types and the per-entry codec (`entry`)
//! - Versioning, atomic writes and base64 fields for the JSON file (`format`)
//! - The `Vault` aggregate with lifecycle, CRUD and search (`store`)

pub mod entry;
pub mod format;
pub mod keymanager;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{CipherEntry, EntryFields, EntryMetadata, EntryUpdate, PlainEntry};
pub use format::{FormatVersion, CURRENT_VERSION};
pub use keymanager::{unwrap_master_key, wrap_master_key, WrappedKey};
pub use store::Vault;
