//! Base package set installation.
//!
//! Removes the distribution browser first (best effort — a fresh image may
//! not carry it), refreshes the index so the third-party repositories from
//! the repos handler are visible, then installs the curated set in one
//! transaction.

use crate::config::SetupConfig;
use crate::error::Result;
use crate::{apt, runner};
use tracing::info;

/// Distribution browser replaced by the archive/vendor installs.
pub const REMOVED_BROWSER: &str = "firefox-esr";

/// Curated base set. The vendor packages at the end resolve from the
/// repositories configured by the repos handler.
pub const BASE_PACKAGES: &[&str] = &[
    "git",
    "vim",
    "htop",
    "tmux",
    "fzf",
    "ripgrep",
    "fd-find",
    "build-essential",
    "fish",
    "flatpak",
    "mpv",
    "keepassxc",
    // Vendor repositories
    "code",
    "brave-browser",
    "docker-ce",
    "docker-ce-cli",
    "containerd.io",
];

/// Install the base package set.
pub fn install_base(_config: &SetupConfig) -> Result<()> {
    apt::remove_best_effort(REMOVED_BROWSER);
    apt::update()?;
    apt::install(BASE_PACKAGES)?;

    if runner::is_dry_run() {
        info!("[dry-run] base package set previewed");
    } else {
        info!("Base package set installed ({} packages)", BASE_PACKAGES.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_packages_nonempty_and_unique() {
        assert!(!BASE_PACKAGES.is_empty());

        let mut seen = std::collections::HashSet::new();
        for package in BASE_PACKAGES {
            assert!(seen.insert(package), "duplicate package: {}", package);
        }
    }

    #[test]
    fn test_removed_browser_not_reinstalled() {
        assert!(!BASE_PACKAGES.contains(&REMOVED_BROWSER));
    }
}
