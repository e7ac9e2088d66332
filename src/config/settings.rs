use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::errors::{PwVaultError, Result};

/// Smallest scrypt `N` accepted for new vaults.
pub const MIN_KDF_N: u64 = 16_384;

/// Configuration loaded from `.pwvault.toml`.
///
/// Every field has a sensible default so pwvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file used when `--file` / `PWVAULT_FILE` are not given.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// scrypt cost factor for new vaults and password changes.
    #[serde(default = "default_kdf_n")]
    pub kdf_n: u64,

    #[serde(default = "default_kdf_r")]
    pub kdf_r: u32,

    #[serde(default = "default_kdf_p")]
    pub kdf_p: u32,

    /// Seconds before `show --copy` clears the clipboard (0 = never).
    #[serde(default = "default_clipboard_clear_secs")]
    pub clipboard_clear_secs: u64,

    /// Default length for `generate` and `add --generate`.
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "vault.json".to_string()
}

fn default_kdf_n() -> u64 {
    32_768
}

fn default_kdf_r() -> u32 {
    8
}

fn default_kdf_p() -> u32 {
    1
}

fn default_clipboard_clear_secs() -> u64 {
    20
}

fn default_generator_length() -> usize {
    20
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            kdf_n: default_kdf_n(),
            kdf_r: default_kdf_r(),
            kdf_p: default_kdf_p(),
            clipboard_clear_secs: default_clipboard_clear_secs(),
            generator_length: default_generator_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".pwvault.toml";

    /// Load settings from `<dir>/.pwvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed or holds unusable values, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PwVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;
        settings.validate()?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reject values that would produce a broken or weak vault.
    pub fn validate(&self) -> Result<()> {
        if self.vault_file.trim().is_empty() {
            return Err(PwVaultError::ConfigError(
                "vault_file cannot be empty".into(),
            ));
        }
        if self.kdf_n < MIN_KDF_N {
            return Err(PwVaultError::ConfigError(format!(
                "kdf_n must be at least {MIN_KDF_N} (got {})",
                self.kdf_n
            )));
        }
        KdfParams::new(self.kdf_n, self.kdf_r, self.kdf_p, 32)
            .map_err(|e| PwVaultError::ConfigError(e.to_string()))?;
        Ok(())
    }

    /// The scrypt parameters for new vaults and password changes.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        self.validate()?;
        KdfParams::new(self.kdf_n, self.kdf_r, self.kdf_p, 32)
    }

    /// Resolve the configured vault file against `dir`.
    ///
    /// Absolute paths are returned unchanged.
    pub fn vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_file, "vault.json");
        assert_eq!(s.kdf_n, 32_768);
        assert_eq!(s.kdf_r, 8);
        assert_eq!(s.kdf_p, 1);
        assert_eq!(s.clipboard_clear_secs, 20);
        assert_eq!(s.generator_length, 20);
        assert_eq!(s.kdf_params().unwrap(), KdfParams::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_file = "secrets/passwords.json"
kdf_n = 65536
kdf_r = 8
kdf_p = 2
clipboard_clear_secs = 5
generator_length = 32
"#;
        fs::write(tmp.path().join(".pwvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_file, "secrets/passwords.json");
        assert_eq!(settings.kdf_n, 65_536);
        assert_eq!(settings.kdf_p, 2);
        assert_eq!(settings.clipboard_clear_secs, 5);
        assert_eq!(settings.generator_length, 32);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwvault.toml"), "generator_length = 40\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.generator_length, 40);
        assert_eq!(settings.vault_file, "vault.json");
        assert_eq!(settings.kdf_n, 32_768);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwvault.toml"), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_rejects_weak_or_invalid_kdf() {
        let tmp = TempDir::new().unwrap();

        fs::write(tmp.path().join(".pwvault.toml"), "kdf_n = 1024\n").unwrap();
        assert!(matches!(
            Settings::load(tmp.path()),
            Err(PwVaultError::ConfigError(_))
        ));

        fs::write(tmp.path().join(".pwvault.toml"), "kdf_n = 50000\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());

        fs::write(tmp.path().join(".pwvault.toml"), "kdf_r = 0\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn vault_path_joins_relative_file() {
        let s = Settings::default();
        assert_eq!(
            s.vault_path(Path::new("/home/user")),
            PathBuf::from("/home/user/vault.json")
        );
    }

    #[cfg(unix)]
    #[test]
    fn vault_path_keeps_absolute_file() {
        let s = Settings {
            vault_file: "/var/lib/pw/vault.json".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            s.vault_path(Path::new("/home/user")),
            PathBuf::from("/var/lib/pw/vault.json")
        );
    }
}
