//! `pwvault passwd`: change the master password.
//!
//! Only the wrapped master key and the verification blob change; the
//! entries are not re-encrypted.  The vault moves to the scrypt
//! parameters from the current settings at the same time.

use crate::cli::output;
use crate::cli::{
    load_settings, prompt_new_password, prompt_password, vault_path, Cli, NEW_PASSWORD_ENV,
};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut vault = Vault::load(&path)?;

    // 1. Check the current password before asking for a new one.
    output::info("Enter your current master password.");
    let old_password = prompt_password()?;
    let master_key = vault.unlock(old_password.as_bytes())?;

    // 2. Prompt for the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. Re-wrap with the key recovered above and save atomically.
    vault.change_password_unlocked(&master_key, new_password.as_bytes(), settings.kdf_params()?)?;
    vault.save(&path)?;

    output::success(&format!(
        "Master password changed ({} entries untouched)",
        vault.len()
    ));

    Ok(())
}
