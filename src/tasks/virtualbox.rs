//! VirtualBox installation from the vendor `.run` installer.
//!
//! Installs kernel build dependencies, downloads the pinned installer,
//! verifies it against the pinned SHA-256 before execution, runs it, then
//! rebuilds the kernel modules via `vboxconfig`.

use crate::config::SetupConfig;
use crate::download;
use crate::error::Result;
use crate::{apt, runner};
use std::path::PathBuf;
use tracing::info;

/// Pinned installer version. Bump the digest together with the version.
pub const VERSION: &str = "7.0.20";
pub const INSTALLER_URL: &str =
    "https://download.virtualbox.org/virtualbox/7.0.20/VirtualBox-7.0.20-163906-Linux_amd64.run";
pub const INSTALLER_SHA256: &str =
    "2f3b54d9a01f0e5fbdbb3e8c34a7e9a4c11f4597a4a0fcd9484dbca3db9b9602";

/// Kernel module build dependencies.
pub const BUILD_DEPS: &[&str] = &["build-essential", "dkms", "linux-headers-amd64"];

fn installer_dest() -> PathBuf {
    std::env::temp_dir().join(format!("VirtualBox-{}-Linux_amd64.run", VERSION))
}

/// Full handler: build deps, verified download, installer, module build.
pub fn run(_config: &SetupConfig) -> Result<()> {
    apt::install(BUILD_DEPS)?;

    let dest = installer_dest();
    download::fetch_verified(INSTALLER_URL, &dest, INSTALLER_SHA256)?;

    let dest_str = dest.display().to_string();
    runner::run_interactive("sh", &[&dest_str], &[])?;
    runner::run("/sbin/vboxconfig", &[], &[])?;

    info!("VirtualBox {} installed", VERSION);
    Ok(())
}
