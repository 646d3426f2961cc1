//! Setup context handling for saving and loading provisioning configs.
//!
//! Every handler receives an explicit [`SetupConfig`] instead of reaching for
//! process-wide environment variables or the current working directory. The
//! context can be detected from the environment (the common case), or loaded
//! from a JSON file for unattended runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Explicit provisioning context passed into every handler.
///
/// Paths are absolute. The system-side directories default to the standard
/// Debian locations and exist mostly so tests can point them at a tempdir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// User being provisioned (not root, even when running under sudo)
    pub target_user: String,
    /// Home directory of the target user
    pub home_dir: PathBuf,
    /// Where user-downloaded archives are looked for
    pub downloads_dir: PathBuf,
    /// Login shell set for the target user
    pub login_shell: PathBuf,
    /// Prefix for archive-based application installs
    pub install_prefix: PathBuf,
    /// Symlink destination on the binary search path
    pub bin_dir: PathBuf,
    /// Desktop-entry directory
    pub applications_dir: PathBuf,
    /// Vendor keyring directory
    pub keyrings_dir: PathBuf,
    /// apt source-list fragment directory
    pub sources_dir: PathBuf,
}

impl SetupConfig {
    /// Build a context for the given user and home directory with the
    /// standard Debian system paths.
    pub fn for_user(user: impl Into<String>, home_dir: impl Into<PathBuf>) -> Self {
        let home_dir = home_dir.into();
        Self {
            target_user: user.into(),
            downloads_dir: home_dir.join("Downloads"),
            home_dir,
            login_shell: PathBuf::from("/usr/bin/fish"),
            install_prefix: PathBuf::from("/opt"),
            bin_dir: PathBuf::from("/usr/local/bin"),
            applications_dir: PathBuf::from("/usr/share/applications"),
            keyrings_dir: PathBuf::from("/usr/share/keyrings"),
            sources_dir: PathBuf::from("/etc/apt/sources.list.d"),
        }
    }

    /// Detect the context from the environment.
    ///
    /// Prefers `SUDO_USER` so that `sudo debsetup` provisions the invoking
    /// user's account rather than root's.
    pub fn detect() -> Result<Self> {
        let user = std::env::var("SUDO_USER")
            .or_else(|_| std::env::var("USER"))
            .context("Neither SUDO_USER nor USER is set; cannot determine target user")?;

        let home_dir = if user == "root" {
            PathBuf::from("/root")
        } else {
            PathBuf::from("/home").join(&user)
        };

        Ok(Self::for_user(user, home_dir))
    }

    /// Path of the fish profile written by the shell-profile handler.
    pub fn fish_config_path(&self) -> PathBuf {
        self.home_dir.join(".config/fish/config.fish")
    }

    /// Save the context to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize setup context to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write setup context to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load a context from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read setup context from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse setup context JSON")?;

        Ok(config)
    }

    /// Validate the context
    pub fn validate(&self) -> Result<()> {
        let user = self.target_user.trim();
        if user.is_empty() {
            anyhow::bail!("Target user must be specified");
        }
        if let Some(first_char) = user.chars().next() {
            if !first_char.is_ascii_alphabetic() && first_char != '_' {
                anyhow::bail!("Target user must start with a letter or underscore");
            }
        }
        if !user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            anyhow::bail!("Target user can only contain letters, numbers, '-' and '_'");
        }

        for (name, path) in [
            ("home_dir", &self.home_dir),
            ("downloads_dir", &self.downloads_dir),
            ("login_shell", &self.login_shell),
            ("install_prefix", &self.install_prefix),
            ("bin_dir", &self.bin_dir),
            ("applications_dir", &self.applications_dir),
            ("keyrings_dir", &self.keyrings_dir),
            ("sources_dir", &self.sources_dir),
        ] {
            if !path.is_absolute() {
                anyhow::bail!("{} must be an absolute path (got {:?})", name, path);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user_defaults() {
        let config = SetupConfig::for_user("alice", "/home/alice");
        assert_eq!(config.target_user, "alice");
        assert_eq!(config.downloads_dir, PathBuf::from("/home/alice/Downloads"));
        assert_eq!(
            config.fish_config_path(),
            PathBuf::from("/home/alice/.config/fish/config.fish")
        );
        assert_eq!(config.sources_dir, PathBuf::from("/etc/apt/sources.list.d"));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = SetupConfig::for_user("alice", "/home/alice");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_user() {
        let config = SetupConfig::for_user("", "/home/alice");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_user() {
        let config = SetupConfig::for_user("alice; rm -rf /", "/home/alice");
        assert!(config.validate().is_err());

        let config = SetupConfig::for_user("1alice", "/home/alice");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_relative_path() {
        let mut config = SetupConfig::for_user("alice", "/home/alice");
        config.downloads_dir = PathBuf::from("Downloads");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");

        let config = SetupConfig::for_user("alice", "/home/alice");
        config.save_to_file(&path).unwrap();

        let loaded = SetupConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.target_user, config.target_user);
        assert_eq!(loaded.home_dir, config.home_dir);
        assert_eq!(loaded.login_shell, config.login_shell);
    }
}
