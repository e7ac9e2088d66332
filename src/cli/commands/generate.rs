//! `pwvault generate`: print a random password and its strength.

use crate::cli::output;
use crate::cli::load_settings;
use crate::errors::Result;
use crate::password::{analyze_password_strength, generate_password, PasswordOptions};

/// Execute the `generate` command.
///
/// `length` falls back to `generator_length` from the settings.
pub fn execute(length: Option<usize>, mut options: PasswordOptions) -> Result<()> {
    options.length = match length {
        Some(n) => n,
        None => load_settings()?.generator_length,
    };

    let password = generate_password(&options)?;
    println!("{}", password.as_str());

    let report = analyze_password_strength(&password);
    output::print_strength(&report);

    Ok(())
}
