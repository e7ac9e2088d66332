//! Password utilities that work without a vault: a CSPRNG-backed
//! generator and a heuristic strength analyzer.

pub mod generator;
pub mod strength;

pub use generator::{generate_password, PasswordOptions};
pub use strength::{analyze_password_strength, StrengthLevel, StrengthReport};
