//! `pwvault delete`: remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{PwVaultError, Result};

/// Execute the `delete` command.
///
/// Deleting needs no decryption, but the master password is still
/// required so only the vault owner can remove entries.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let (mut vault, _key) = unlock_vault(&path)?;

    let title = vault
        .entry(id)
        .map(|e| e.title.clone())
        .ok_or_else(|| PwVaultError::EntryNotFound(id.to_string()))?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{title}'?"))
            .default(false)
            .interact()
            .map_err(|e| PwVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.delete(id);
    vault.save(&path)?;

    output::success(&format!(
        "Deleted entry '{title}' ({} remaining)",
        vault.len()
    ));

    Ok(())
}
