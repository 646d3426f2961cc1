//! Third-party apt repository preparation.
//!
//! Three vendors follow the same keyring pattern: fetch the vendor signing
//! key into the keyrings directory, fetch the vendor's source-list template,
//! rewrite it so every entry is pinned to that keyring via `signed-by`, and
//! write the result into the apt sources directory.
//!
//! Re-running is idempotent: the guard is the source-list file itself (does
//! it exist and reference our keyring), not "is the vendor binary on PATH" —
//! a binary can outlive its repository file and vice versa.
//!
//! One vendor (Ollama) ships only an installer script. The script is fetched
//! to a temporary path, verified against a pinned SHA-256, and only then
//! executed.

use crate::config::SetupConfig;
use crate::download;
use crate::error::Result;
use crate::runner;
use std::path::PathBuf;
use tracing::info;

/// A vendor apt repository using the keyring + pinned source-list pattern.
#[derive(Debug, Clone, Copy)]
pub struct AptRepo {
    /// Vendor name used in log lines
    pub name: &'static str,
    /// Binary the vendor's package installs (informational)
    pub binary: &'static str,
    /// Signing key URL
    pub key_url: &'static str,
    /// Keyring file name under the keyrings directory
    pub keyring: &'static str,
    /// Source-list template URL
    pub list_url: &'static str,
    /// Source-list file name under the apt sources directory
    pub list_file: &'static str,
}

/// Vendors configured by the repository handler.
pub const REPOS: &[AptRepo] = &[
    AptRepo {
        name: "vscode",
        binary: "code",
        key_url: "https://packages.microsoft.com/keys/microsoft.asc",
        keyring: "packages.microsoft.asc",
        list_url: "https://packages.microsoft.com/repos/code/config.list",
        list_file: "vscode.list",
    },
    AptRepo {
        name: "brave",
        binary: "brave-browser",
        key_url:
            "https://brave-browser-apt-release.s3.brave.com/brave-browser-archive-keyring.gpg",
        keyring: "brave-browser-archive-keyring.gpg",
        list_url: "https://brave-browser-apt-release.s3.brave.com/brave-browser-release.list",
        list_file: "brave-browser-release.list",
    },
    AptRepo {
        name: "docker",
        binary: "docker",
        key_url: "https://download.docker.com/linux/debian/gpg",
        keyring: "docker-archive-keyring.asc",
        list_url: "https://download.docker.com/linux/debian/docker.list",
        list_file: "docker.list",
    },
];

/// Ollama installer script, pinned to the revision audited for this pin.
pub const OLLAMA_INSTALLER_URL: &str = "https://ollama.com/install.sh";
pub const OLLAMA_INSTALLER_SHA256: &str =
    "6b5c6b0a9b73c4c43bcea5f1e56c12532bedd9b35e0f5dbf0b69a0a7c1f3a7d4";

/// Rewrite a source-list template so every `deb`/`deb-src` entry is pinned
/// to the given keyring path via `signed-by`.
///
/// Handles entries both with and without an existing option block; an
/// existing `signed-by` value is replaced. Applying the rewrite twice
/// yields the same output.
pub fn pin_signed_by(template: &str, keyring_path: &str) -> String {
    let mut out = String::with_capacity(template.len() + 64);

    for line in template.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("deb ")
            || trimmed.starts_with("deb-src ")
            || trimmed.starts_with("deb\t")
            || trimmed.starts_with("deb-src\t")
        {
            out.push_str(&pin_entry_line(line, keyring_path));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }

    out
}

/// Pin a single `deb`/`deb-src` line.
fn pin_entry_line(line: &str, keyring_path: &str) -> String {
    let signed_by = format!("signed-by={}", keyring_path);

    if let (Some(open), Some(close)) = (line.find('['), line.find(']')) {
        if open < close {
            // Rewrite the existing option block, replacing any signed-by
            let mut kept: Vec<String> = line[open + 1..close]
                .split_whitespace()
                .filter(|opt| !opt.starts_with("signed-by="))
                .map(String::from)
                .collect();
            kept.push(signed_by);
            return format!("{}[{}]{}", &line[..open], kept.join(" "), &line[close + 1..]);
        }
    }

    // No option block: insert one after the deb/deb-src token
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);
    match rest.split_once(char::is_whitespace) {
        Some((kind, tail)) => format!("{}{} [{}] {}", indent, kind, signed_by, tail.trim_start()),
        None => line.to_string(),
    }
}

fn keyring_path(config: &SetupConfig, repo: &AptRepo) -> PathBuf {
    config.keyrings_dir.join(repo.keyring)
}

fn list_path(config: &SetupConfig, repo: &AptRepo) -> PathBuf {
    config.sources_dir.join(repo.list_file)
}

/// Whether the vendor's source list is already in place and pinned to our
/// keyring. This, not binary presence, decides whether to skip.
pub fn is_configured(config: &SetupConfig, repo: &AptRepo) -> bool {
    let keyring = keyring_path(config, repo);
    match std::fs::read_to_string(list_path(config, repo)) {
        Ok(content) => content.contains(&keyring.display().to_string()),
        Err(_) => false,
    }
}

/// Configure one vendor repository.
pub fn configure_repo(config: &SetupConfig, repo: &AptRepo) -> Result<()> {
    if is_configured(config, repo) {
        info!("{}: source list already configured, skipping", repo.name);
        return Ok(());
    }

    info!("{}: configuring repository (binary: {})", repo.name, repo.binary);

    let keyring = keyring_path(config, repo);
    download::fetch(repo.key_url, &keyring)?;

    let template = download::fetch_string(repo.list_url)?;
    let pinned = pin_signed_by(&template, &keyring.display().to_string());
    runner::write_file(&list_path(config, repo), &pinned)?;

    Ok(())
}

/// Install Ollama via its vendor installer script, checksum-verified.
pub fn install_ollama(_config: &SetupConfig) -> Result<()> {
    if runner::binary_exists("ollama") {
        info!("ollama: already installed, skipping");
        return Ok(());
    }

    let script = std::env::temp_dir().join("debsetup-ollama-install.sh");
    download::fetch_verified(OLLAMA_INSTALLER_URL, &script, OLLAMA_INSTALLER_SHA256)?;

    let script_str = script.display().to_string();
    runner::run_interactive("sh", &[&script_str], &[])
}

/// Configure every vendor repository, then the script-installed vendor.
/// Stops at the first failure.
pub fn configure_all(config: &SetupConfig) -> Result<()> {
    for repo in REPOS {
        configure_repo(config, repo)?;
    }
    install_ollama(config)?;
    Ok(())
}
