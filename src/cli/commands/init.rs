//! `pwvault init`: create a new, empty vault file.

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, vault_path, Cli, PASSWORD_ENV};
use crate::errors::{PwVaultError, Result};
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // 1. Refuse to overwrite an existing vault.
    if path.exists() {
        output::tip("Use `pwvault add` to add entries to the existing vault.");
        return Err(PwVaultError::VaultAlreadyExists(path));
    }

    // 2. Create the parent directory if needed.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            output::info(&format!("Created directory: {}", parent.display()));
        }
    }

    // 3. Prompt for a new password (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 4. Create and write the vault.
    let (vault, _key) = Vault::create_with_params(password.as_bytes(), settings.kdf_params()?)?;
    vault.save(&path)?;

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `pwvault add --title <TITLE>` to add your first entry.");

    Ok(())
}
