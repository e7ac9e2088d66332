//! `pwvault show`: decrypt and print (or copy) a single entry.

use std::io::{self, IsTerminal};
use std::time::Duration;

use dialoguer::Select;

use crate::cli::clipboard::copy_then_clear;
use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{PwVaultError, Result};
use crate::vault::{EntryMetadata, Vault};

/// How the user identified the entry.
pub enum Selector<'a> {
    Id(&'a str),
    Title(&'a str),
}

/// Execute the `show` command.
pub fn execute(cli: &Cli, selector: Selector<'_>, copy: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let (vault, key) = unlock_vault(&path)?;

    let id = match selector {
        Selector::Id(id) => id.to_string(),
        Selector::Title(title) => resolve_title(&vault, title)?,
    };

    let (plain, cipher) = vault.get_decrypted(&key, &id)?;
    let meta = EntryMetadata::from(cipher);

    output::print_entry(&meta, &plain, !copy);

    if copy {
        let delay = Duration::from_secs(settings.clipboard_clear_secs);
        if delay.is_zero() {
            copy_then_clear(&plain.password, delay)?;
            output::success("Password copied to clipboard.");
        } else {
            output::success(&format!(
                "Password copied to clipboard; clearing in {}s.",
                settings.clipboard_clear_secs
            ));
            copy_then_clear(&plain.password, delay)?;
            output::info("Clipboard cleared.");
        }
    }

    Ok(())
}

/// Exact title matches win; otherwise fall back to substring search.
/// Several candidates trigger an interactive pick.
fn resolve_title(vault: &Vault, title: &str) -> Result<String> {
    let mut candidates = vault.find_by_exact_title(title);
    if candidates.is_empty() {
        candidates = vault.search_titles(title);
    }

    match candidates.len() {
        0 => Err(PwVaultError::EntryNotFound(title.to_string())),
        1 => Ok(candidates.remove(0).id),
        _ => pick(candidates, title),
    }
}

fn pick(candidates: Vec<EntryMetadata>, title: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        return Err(PwVaultError::CommandFailed(format!(
            "{} entries match '{title}'; use --id to pick one",
            candidates.len()
        )));
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|c| format!("{}  ({})", c.title, c.id))
        .collect();

    let choice = Select::new()
        .with_prompt("Several entries match, pick one")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| PwVaultError::CommandFailed(format!("selection prompt: {e}")))?
        .ok_or(PwVaultError::UserCancelled)?;

    Ok(candidates[choice].id.clone())
}
