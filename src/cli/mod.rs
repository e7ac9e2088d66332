//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod clipboard;
pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::keys::MasterKey;
use crate::errors::{PwVaultError, Result};
use crate::password::{analyze_password_strength, StrengthLevel};
use crate::vault::Vault;

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "PWVAULT_PASSWORD";

/// Environment variable holding the new password for `passwd`.
pub const NEW_PASSWORD_ENV: &str = "PWVAULT_NEW_PASSWORD";

/// pwvault CLI: a local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "pwvault",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: vault.json, or `vault_file` in .pwvault.toml)
    #[arg(long, env = "PWVAULT_FILE", global = true)]
    pub file: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Add an entry
    Add {
        /// Entry title (shown in listings)
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        username: Option<String>,

        /// Entry password (omit for an interactive prompt)
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,

        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List all entries (no password needed)
    List,

    /// Search entry titles (no password needed)
    Search {
        /// Case-insensitive substring of the title
        query: String,
    },

    /// Decrypt and show an entry
    Show {
        /// Entry id
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        id: Option<String>,

        /// Entry title (exact match preferred, then substring)
        #[arg(short, long)]
        title: Option<String>,

        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Change fields of an entry
    Edit {
        /// Entry id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,

        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the master password
    Passwd,

    /// Generate a random password
    Generate {
        /// Password length (default: `generator_length` from config)
        #[arg(short, long)]
        length: Option<usize>,

        #[arg(long)]
        no_upper: bool,

        #[arg(long)]
        no_lower: bool,

        #[arg(long)]
        no_digits: bool,

        #[arg(long)]
        no_symbols: bool,

        /// Leave out look-alike characters (il1Lo0O)
        #[arg(long)]
        exclude_similar: bool,

        /// Leave out brackets, quotes and other awkward punctuation
        #[arg(long)]
        exclude_ambiguous: bool,
    },

    /// Rate the strength of a password
    Strength {
        /// Password to rate (omit for an interactive prompt)
        password: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.pwvault.toml` from the working directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the vault file: `--file` / `PWVAULT_FILE`, else the config.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.file {
        Some(path) => Ok(path.clone()),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(settings.vault_path(&cwd))
        }
    }
}

/// Get the master password, trying in order:
/// 1. `PWVAULT_PASSWORD` env var (scripts, CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` is consulted first for scripted use.  Enforces a minimum
/// length and warns about weak choices.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            let pw = Zeroizing::new(pw);
            check_new_password(&pw)?;
            return Ok(pw);
        }
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| PwVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        match check_new_password(&password) {
            Ok(()) => return Ok(password),
            Err(e) => output::warning(&format!("{e}. Try again.")),
        }
    }
}

/// Length gate plus a strength warning for new master passwords.
fn check_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PwVaultError::InvalidInput(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let report = analyze_password_strength(password);
    if report.level == StrengthLevel::Weak {
        output::warning(&format!(
            "This master password is weak (score {}/100).",
            report.score
        ));
    }
    Ok(())
}

/// Load the vault at `path` and unlock it with the master password.
pub fn unlock_vault(path: &std::path::Path) -> Result<(Vault, MasterKey)> {
    let vault = Vault::load(path)?;
    let password = prompt_password()?;
    let key = vault.unlock(password.as_bytes())?;
    Ok((vault, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_new_password_is_rejected() {
        assert!(check_new_password("short").is_err());
        assert!(check_new_password("long-enough-Passw0rd!").is_ok());
    }

    #[test]
    fn show_requires_id_or_title() {
        assert!(Cli::try_parse_from(["pwvault", "show"]).is_err());
        assert!(Cli::try_parse_from(["pwvault", "show", "--id", "x", "--title", "y"]).is_err());
        assert!(Cli::try_parse_from(["pwvault", "show", "--title", "GitHub"]).is_ok());
    }

    #[test]
    fn add_password_conflicts_with_generate() {
        let args = ["pwvault", "add", "-t", "x", "-p", "pw", "--generate"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn explicit_file_wins_over_settings() {
        let cli = Cli::try_parse_from(["pwvault", "--file", "/tmp/other.json", "list"]).unwrap();
        let path = vault_path(&cli, &Settings::default()).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/other.json"));
    }
}
