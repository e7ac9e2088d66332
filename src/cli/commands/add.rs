//! `pwvault add`: encrypt and store a new entry.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{PwVaultError, Result};
use crate::password::{generate_password, PasswordOptions};
use crate::vault::EntryFields;

/// Arguments of the `add` command.
pub struct AddArgs<'a> {
    pub title: &'a str,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub url: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: AddArgs<'_>) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // Unlock first so a wrong master password fails before any prompts.
    let (mut vault, key) = unlock_vault(&path)?;

    // Determine the entry password from one of three sources.
    let secret = if let Some(p) = args.password {
        // Source 1: inline value on the command line.
        output::warning("Password given on the command line may appear in shell history.");
        Zeroizing::new(p.to_string())
    } else if args.generate {
        // Source 2: generator with the configured length.
        let options = PasswordOptions {
            length: settings.generator_length,
            ..PasswordOptions::default()
        };
        generate_password(&options)?
    } else {
        // Source 3: interactive secure prompt (default).
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Password for '{}'", args.title))
                .allow_empty_password(true)
                .interact()
                .map_err(|e| PwVaultError::CommandFailed(format!("input prompt: {e}")))?,
        )
    };

    let fields = EntryFields {
        title: args.title.to_string(),
        username: args.username.unwrap_or_default().to_string(),
        password: secret.to_string(),
        url: args.url.unwrap_or_default().to_string(),
        notes: args.notes.unwrap_or_default().to_string(),
    };

    let id = vault.add_entry(&key, fields)?;
    vault.save(&path)?;

    output::success(&format!(
        "Entry '{}' added ({} total)",
        args.title,
        vault.len()
    ));
    println!("{id}");
    if args.generate {
        output::tip("Run `pwvault show --id <ID> --copy` to copy the generated password.");
    }

    Ok(())
}
