//! Flatpak application installation.
//!
//! Ensures the flatpak package manager is present, registers the Flathub
//! remote if it is not already known, and installs a fixed list of
//! application IDs.

use crate::config::SetupConfig;
use crate::error::Result;
use crate::{apt, runner};
use tracing::info;

/// Remote name and .flatpakrepo URL for Flathub.
pub const FLATHUB_NAME: &str = "flathub";
pub const FLATHUB_URL: &str = "https://dl.flathub.org/repo/flathub.flatpakrepo";

/// Applications installed by this handler.
pub const APPS: &[&str] = &[
    "org.signal.Signal",
    "org.gimp.GIMP",
    "org.videolan.VLC",
    "com.obsproject.Studio",
    "com.github.tchx84.Flatseal",
    "md.obsidian.Obsidian",
];

/// Parse remote names out of `flatpak remotes` output (first column).
pub fn parse_remote_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(String::from)
        .collect()
}

fn has_flathub() -> Result<bool> {
    let output = runner::capture("flatpak", &["remotes"])?;
    output.ensure_success("flatpak remotes")?;
    Ok(parse_remote_names(&output.stdout)
        .iter()
        .any(|name| name == FLATHUB_NAME))
}

/// Install the application list.
pub fn run(_config: &SetupConfig) -> Result<()> {
    if !runner::binary_exists("flatpak") {
        info!("flatpak not present, installing it first");
        apt::install(&["flatpak"])?;
    }

    if runner::is_dry_run() || !has_flathub()? {
        runner::run(
            "flatpak",
            &["remote-add", "--if-not-exists", FLATHUB_NAME, FLATHUB_URL],
            &[],
        )?;
    } else {
        info!("Flathub remote already registered");
    }

    let mut args = vec!["install", "-y", "--noninteractive", FLATHUB_NAME];
    args.extend_from_slice(APPS);
    runner::run_interactive("flatpak", &args, &[])?;

    info!("Installed {} Flatpak application(s)", APPS.len());
    Ok(())
}
