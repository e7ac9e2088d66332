//! Random password generation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use zeroize::Zeroizing;

use crate::errors::{PwVaultError, Result};

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*_+-=";

/// Characters that are easy to confuse visually.
const SIMILAR: &str = "il1Lo0O";

/// Characters that tend to break shells, URLs or config files.
const AMBIGUOUS: &str = "{}[]()/'\"`,;:.<>\\";

/// Requested lengths below this fall back to `FALLBACK_LENGTH`.
const MIN_LENGTH: usize = 4;
const FALLBACK_LENGTH: usize = 12;

/// What the generator is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordOptions {
    pub length: usize,
    pub include_upper: bool,
    pub include_lower: bool,
    pub include_digits: bool,
    pub include_symbols: bool,
    /// Drop `il1Lo0O`.
    pub exclude_similar: bool,
    /// Drop brackets, quotes, slashes and similar punctuation.
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 20,
            include_upper: true,
            include_lower: true,
            include_digits: true,
            include_symbols: true,
            exclude_similar: false,
            exclude_ambiguous: false,
        }
    }
}

impl PasswordOptions {
    /// The characters of `class` that survive the exclusion options.
    fn filter(&self, class: &str) -> Vec<u8> {
        class
            .bytes()
            .filter(|b| !(self.exclude_similar && SIMILAR.as_bytes().contains(b)))
            .filter(|b| !(self.exclude_ambiguous && AMBIGUOUS.as_bytes().contains(b)))
            .collect()
    }

    /// One filtered pool per selected class.  Classes emptied by the
    /// exclusions are left out.
    fn pools(&self) -> Vec<Vec<u8>> {
        [
            (self.include_upper, UPPER),
            (self.include_lower, LOWER),
            (self.include_digits, DIGITS),
            (self.include_symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(selected, _)| *selected)
        .map(|(_, class)| self.filter(class))
        .filter(|pool| !pool.is_empty())
        .collect()
    }
}

/// Generate a password according to `options`.
///
/// Every selected class contributes at least one character, the rest is
/// drawn from the union, and the result is shuffled.  Fails with
/// `InvalidInput` when the options leave no usable characters.
pub fn generate_password(options: &PasswordOptions) -> Result<Zeroizing<String>> {
    let pools = options.pools();
    let charset: Vec<u8> = pools.iter().flatten().copied().collect();
    if charset.is_empty() {
        return Err(PwVaultError::InvalidInput(
            "no characters left to generate a password from".into(),
        ));
    }

    let length = if options.length < MIN_LENGTH {
        FALLBACK_LENGTH
    } else {
        options.length
    };

    let mut rng = StdRng::try_from_os_rng()
        .map_err(|e| PwVaultError::RandomSourceFailed(e.to_string()))?;

    let mut out = Zeroizing::new(Vec::with_capacity(length));
    for pool in &pools {
        out.push(pool[rng.random_range(0..pool.len())]);
    }
    while out.len() < length {
        out.push(charset[rng.random_range(0..charset.len())]);
    }
    out.shuffle(&mut rng);

    // Every byte comes from the ASCII tables above.
    let password: String = out.iter().map(|&b| char::from(b)).collect();
    Ok(Zeroizing::new(password))
}
