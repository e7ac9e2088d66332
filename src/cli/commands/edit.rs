//! `pwvault edit`: change selected fields of an entry.
//!
//! Fields that are not passed keep their current value.  The entry is
//! re-encrypted under a fresh nonce; its id and creation time stay.

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{PwVaultError, Result};
use crate::password::{generate_password, PasswordOptions};
use crate::vault::EntryUpdate;

/// Arguments of the `edit` command.
pub struct EditArgs<'a> {
    pub id: &'a str,
    pub title: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub url: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, args: EditArgs<'_>) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    let mut update = EntryUpdate {
        title: args.title.map(str::to_string),
        username: args.username.map(str::to_string),
        password: args.password.map(str::to_string),
        url: args.url.map(str::to_string),
        notes: args.notes.map(str::to_string),
    };

    if args.generate {
        let options = PasswordOptions {
            length: settings.generator_length,
            ..PasswordOptions::default()
        };
        update.password = Some(generate_password(&options)?.to_string());
    }

    if update.is_empty() {
        return Err(PwVaultError::InvalidInput(
            "nothing to change; pass at least one field".into(),
        ));
    }

    let (mut vault, key) = unlock_vault(&path)?;
    vault.update_entry(&key, args.id, update)?;
    vault.save(&path)?;

    output::success(&format!("Entry '{}' updated", args.id));

    Ok(())
}
