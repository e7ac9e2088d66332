//! `pwvault list`: display all entries in a table.
//!
//! Titles are stored in clear text, so no password is needed.

use crate::cli::output;
use crate::cli::{load_settings, vault_path, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let vault = Vault::load(&path)?;

    if vault.is_empty() {
        output::info("No entries in this vault yet.");
        output::tip("Run `pwvault add --title <TITLE>` to add your first entry.");
        return Ok(());
    }

    let noun = if vault.len() == 1 { "entry" } else { "entries" };
    output::info(&format!("{} {noun}", vault.len()));
    output::print_entries_table(&vault.list());

    Ok(())
}
