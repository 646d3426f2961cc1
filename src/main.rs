//! debsetup - main entry point
//!
//! Provision a Debian-based workstation from a numbered menu, or run a
//! single handler directly via a subcommand.

use anyhow::{Context, Result};
use std::str::FromStr;
use tracing::{debug, error, info, warn};

use debsetup::cli::{Cli, Commands};
use debsetup::config::SetupConfig;
use debsetup::tasks::desktop::DesktopEnvironment;
use debsetup::{menu, preflight, process_guard, runner, tasks};

/// Initialize the logger with appropriate settings
fn init_logger() {
    use tracing_subscriber::EnvFilter;

    // RUST_LOG overrides the info default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main application entry point
fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    info!("debsetup starting up");

    // Signal handlers first, so a killed session cannot orphan a running
    // apt-get or vendor installer
    if let Err(e) = process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
        // Continue anyway - commands still run in their own process groups
    }
    debug!("Signal handlers initialized");

    let cli = Cli::parse_args();
    runner::set_dry_run(cli.dry_run);
    if cli.dry_run {
        info!("Dry-run mode: mutating operations are logged, not executed");
    }

    // Validate is self-contained: no context detection, no preflight
    if let Some(Commands::Validate { config }) = &cli.command {
        return validate_config(config);
    }

    let config = match &cli.config {
        Some(path) => SetupConfig::load_from_file(path)?,
        None => SetupConfig::detect()?,
    };
    config.validate()?;
    debug!("Provisioning context: user={}, home={}", config.target_user, config.home_dir.display());

    // Required binaries and root; a dry run is allowed without root
    preflight::run_preflight_checks(cli.dry_run);

    match cli.command {
        Some(Commands::ShellProfile) => tasks::shell_profile::run(&config)?,
        Some(Commands::Repos) => tasks::repos::configure_all(&config)?,
        Some(Commands::Packages) => tasks::packages::install_base(&config)?,
        Some(Commands::Flatpak) => tasks::flatpak::run(&config)?,
        Some(Commands::Virtualbox) => tasks::virtualbox::run(&config)?,
        Some(Commands::Desktop { environment }) => {
            let choice = environment
                .map(|name| {
                    DesktopEnvironment::from_str(&name)
                        .map_err(|_| anyhow::anyhow!("unknown desktop environment: {}", name))
                })
                .transpose()?;
            tasks::desktop::run(&config, choice)?;
        }
        Some(Commands::Browser) => tasks::browser::install(&config)?,
        Some(Commands::Validate { .. }) => unreachable!("handled above"),
        None => menu::run(&config)?,
    }

    Ok(())
}

/// Validate a context file and report the result
fn validate_config(path: &std::path::Path) -> Result<()> {
    let config = SetupConfig::load_from_file(path)
        .with_context(|| format!("Failed to load context file {:?}", path))?;
    config
        .validate()
        .with_context(|| format!("Context file {:?} is invalid", path))?;

    println!("✓ Context file is valid: {:?}", path);
    Ok(())
}
