//! Operating-system randomness for salts, nonces, keys and entry ids.
//!
//! Everything here reads directly from the OS CSPRNG.  A failure to
//! obtain randomness is surfaced as an error; there is no fallback.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{PwVaultError, Result};

/// Fill `buf` with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| PwVaultError::RandomSourceFailed(e.to_string()))
}

/// Return `N` cryptographically secure random bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}
