//! `pwvault strength`: score a password and suggest improvements.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{PwVaultError, Result};
use crate::password::analyze_password_strength;

/// Execute the `strength` command.
pub fn execute(password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(p) => Zeroizing::new(p.to_string()),
        None => Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Password to rate")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?,
        ),
    };

    let report = analyze_password_strength(&password);
    output::print_strength(&report);

    Ok(())
}
