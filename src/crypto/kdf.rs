//! Password hardening with scrypt.
//!
//! scrypt is memory-hard: its cost grows with `N * r` in both time and
//! memory, which makes GPU/ASIC guessing expensive.  The parameters are
//! stored in the vault file so a vault keeps opening with the exact
//! settings it was created with, even after the defaults change.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::random::random_array;
use crate::errors::{PwVaultError, Result};

/// Length of a freshly generated salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Shortest salt accepted from a vault file.
pub const MIN_SALT_LEN: usize = 16;

/// Output length recorded inside `scrypt::Params`.
const SCRYPT_PARAMS_LEN: usize = 32;

/// Largest accepted scrypt `N` (2^20).
pub const MAX_N: u64 = 1 << 20;

/// Upper bound on scrypt's working memory, `128 * r * N` bytes.
pub const MAX_MEMORY_BYTES: u64 = 1 << 30;

/// scrypt requires `r * p < 2^30`.
const MAX_RP: u64 = 1 << 30;

/// scrypt cost parameters plus the requested output length.
///
/// Serialized as `{"N": .., "r": .., "p": .., "keyLen": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// CPU/memory cost factor; a power of two, at least 2.
    #[serde(rename = "N")]
    pub n: u64,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
    /// Length of the derived key in bytes.
    #[serde(rename = "keyLen")]
    pub key_len: usize,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            n: 32_768,
            r: 8,
            p: 1,
            key_len: 32,
        }
    }
}

impl KdfParams {
    /// Build a parameter set, checking the invariants up front.
    pub fn new(n: u64, r: u32, p: u32, key_len: usize) -> Result<Self> {
        let params = Self { n, r, p, key_len };
        params.validate()?;
        Ok(params)
    }

    /// Check `N` is a power of two ≥ 2, `r, p ≥ 1` and `key_len > 0`,
    /// and that the cost stays within `MAX_N` and `MAX_MEMORY_BYTES`.
    ///
    /// Parameters read from a vault file are not authenticated, so the
    /// cost bounds are what keeps an edited file from exhausting memory.
    pub fn validate(&self) -> Result<()> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(PwVaultError::KeyDerivationFailed(format!(
                "scrypt N must be a power of two >= 2 (got {})",
                self.n
            )));
        }
        if self.n > MAX_N {
            return Err(PwVaultError::KeyDerivationFailed(format!(
                "scrypt N must be at most {MAX_N} (got {})",
                self.n
            )));
        }
        if self.r < 1 {
            return Err(PwVaultError::KeyDerivationFailed(
                "scrypt r must be at least 1".into(),
            ));
        }
        if self.p < 1 {
            return Err(PwVaultError::KeyDerivationFailed(
                "scrypt p must be at least 1".into(),
            ));
        }
        if self.key_len == 0 {
            return Err(PwVaultError::KeyDerivationFailed(
                "derived key length must be greater than 0".into(),
            ));
        }

        let r = u64::from(self.r);
        let p = u64::from(self.p);
        // N <= 2^20 and r < 2^32, so this cannot overflow.
        let memory = 128 * r * self.n;
        if memory > MAX_MEMORY_BYTES {
            return Err(PwVaultError::KeyDerivationFailed(format!(
                "scrypt memory 128*r*N = {memory} bytes exceeds {MAX_MEMORY_BYTES}"
            )));
        }
        if r * p >= MAX_RP {
            return Err(PwVaultError::KeyDerivationFailed(format!(
                "scrypt r*p must be below {MAX_RP} (got {})",
                r * p
            )));
        }
        Ok(())
    }

    /// `log2(N)`, the form the scrypt crate takes.
    fn log_n(&self) -> u8 {
        // validate() guarantees a power of two below 2^64.
        self.n.trailing_zeros() as u8
    }

    fn to_scrypt(self) -> Result<scrypt::Params> {
        self.validate()?;
        // The `len` argument only matters for PHC strings; the raw
        // `scrypt()` call takes its output length from the buffer.
        scrypt::Params::new(self.log_n(), self.r, self.p, SCRYPT_PARAMS_LEN)
            .map_err(|e| PwVaultError::KeyDerivationFailed(format!("invalid scrypt params: {e}")))
    }
}

/// Derive `params.key_len` bytes from a password and salt.
///
/// Deterministic: the same password, salt and params always give the
/// same key.  This is the slow, blocking step of every unlock.
pub fn password_harden(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<Vec<u8>>> {
    let scrypt_params = params.to_scrypt()?;

    tracing::debug!(
        n = params.n,
        r = params.r,
        p = params.p,
        key_len = params.key_len,
        "deriving password key"
    );

    let mut key = Zeroizing::new(vec![0u8; params.key_len]);
    scrypt::scrypt(password, salt, &scrypt_params, key.as_mut_slice())
        .map_err(|e| PwVaultError::KeyDerivationFailed(format!("scrypt failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams::new(1024, 8, 1, 32).unwrap()
    }

    #[test]
    fn default_params_are_valid() {
        assert!(KdfParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_power_of_two_n() {
        assert!(KdfParams::new(1000, 8, 1, 32).is_err());
        assert!(KdfParams::new(1, 8, 1, 32).is_err());
        assert!(KdfParams::new(0, 8, 1, 32).is_err());
    }

    #[test]
    fn rejects_zero_r_p_and_length() {
        assert!(KdfParams::new(1024, 0, 1, 32).is_err());
        assert!(KdfParams::new(1024, 8, 0, 32).is_err());
        assert!(KdfParams::new(1024, 8, 1, 0).is_err());
    }

    #[test]
    fn rejects_cost_beyond_limits() {
        assert!(KdfParams::new(MAX_N, 8, 1, 32).is_ok());
        assert!(matches!(
            KdfParams::new(1 << 40, 8, 1, 32),
            Err(PwVaultError::KeyDerivationFailed(_))
        ));
        assert!(KdfParams::new(MAX_N * 2, 1, 1, 32).is_err());
        // 128 * 16 * 2^20 = 2 GiB
        assert!(KdfParams::new(MAX_N, 16, 1, 32).is_err());
        assert!(KdfParams::new(1024, 8, 1 << 28, 32).is_err());
    }

    #[test]
    fn output_length_follows_params() {
        let params = KdfParams::new(1024, 8, 1, 16).unwrap();
        let key = password_harden(b"pw", b"0123456789abcdef", &params).unwrap();
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let salt = [7u8; 32];
        let a = password_harden(b"hunter2", &salt, &fast()).unwrap();
        let b = password_harden(b"hunter2", &salt, &fast()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_with_short_field_names() {
        let json = serde_json::to_string(&KdfParams::default()).unwrap();
        assert_eq!(json, r#"{"N":32768,"r":8,"p":1,"keyLen":32}"#);
    }
}
