//! `pwvault search`: find entries by title without unlocking.

use crate::cli::output;
use crate::cli::{load_settings, vault_path, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `search` command.
pub fn execute(cli: &Cli, query: &str) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let vault = Vault::load(&path)?;

    let hits = vault.search_titles(query);
    output::info(&format!("{} match(es) for '{}'", hits.len(), query.trim()));
    output::print_entries_table(&hits);

    Ok(())
}
