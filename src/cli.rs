use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// debsetup - menu-driven provisioning for a Debian workstation
#[derive(Parser)]
#[command(name = "debsetup")]
#[command(about = "Provision a Debian-based workstation from a numbered menu")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Mutating operations (package transactions, file writes, downloads
    /// of payloads) are logged and skipped. Read-only probes still execute
    /// so the preview is realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to a setup context JSON file (defaults to environment detection)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the fish profile and change the login shell
    ShellProfile,
    /// Configure third-party apt repositories
    Repos,
    /// Install the curated base package set
    Packages,
    /// Install Flatpak applications
    Flatpak,
    /// Install VirtualBox from the vendor installer
    Virtualbox,
    /// Switch desktop environment
    Desktop {
        /// Environment to switch to (gnome, kde); prompts when omitted
        #[arg(short, long)]
        environment: Option<String>,
    },
    /// Install the Zen browser from a downloaded archive
    Browser,
    /// Validate a setup context file
    Validate {
        /// Path to the context file to validate
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
