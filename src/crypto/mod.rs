//! Cryptographic primitives for pwvault.
//!
//! This module provides:
//! - AES-GCM authenticated encryption with associated data (`aead`)
//! - scrypt password hardening (`kdf`)
//! - HKDF-SHA256 subkey derivation and the `MasterKey` wrapper (`keys`)
//! - OS randomness for salts, nonces, keys and ids (`random`)

pub mod aead;
pub mod kdf;
pub mod keys;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, password_harden, ...};
pub use aead::{generate_nonce, open, seal};
pub use kdf::{generate_salt, password_harden, KdfParams};
pub use keys::{derive_entry_key, derive_subkey, MasterKey};
