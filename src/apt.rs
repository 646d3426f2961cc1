//! Debian package management wrapper.
//!
//! Thin, logged front-end over `apt-get` and `dpkg-query`. Transactions run
//! with the operator's terminal attached so apt's own progress output stays
//! visible; state queries are captured and parsed.
//!
//! All invocations are non-interactive (`DEBIAN_FRONTEND=noninteractive`,
//! `-y`) — the operator already made their choice in the menu.

use crate::error::Result;
use crate::runner;
use tracing::{info, warn};

const NONINTERACTIVE: &[(&str, &str)] = &[("DEBIAN_FRONTEND", "noninteractive")];

/// Refresh the package index.
pub fn update() -> Result<()> {
    runner::run_interactive("apt-get", &["update"], NONINTERACTIVE)
}

/// Install packages. Empty target list is a no-op.
pub fn install(packages: &[&str]) -> Result<()> {
    if packages.is_empty() {
        warn!("install called with empty target list");
        return Ok(());
    }

    info!("Installing {} package(s): {}", packages.len(), packages.join(" "));

    let mut args = vec!["install", "-y"];
    args.extend_from_slice(packages);
    runner::run_interactive("apt-get", &args, NONINTERACTIVE)
}

/// Purge packages (remove including configuration files).
pub fn purge(packages: &[&str]) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }

    info!("Purging {} package(s): {}", packages.len(), packages.join(" "));

    let mut args = vec!["purge", "-y"];
    args.extend_from_slice(packages);
    runner::run_interactive("apt-get", &args, NONINTERACTIVE)
}

/// Remove packages left without a reverse dependency.
pub fn autoremove() -> Result<()> {
    runner::run_interactive("apt-get", &["autoremove", "-y"], NONINTERACTIVE)
}

/// Remove a package, ignoring failure (e.g. the package was never installed).
pub fn remove_best_effort(package: &str) {
    info!("Removing {} (best effort)", package);
    runner::run_best_effort("apt-get", &["remove", "-y", package], NONINTERACTIVE);
}

/// Whether a package is currently installed, per dpkg's status database.
///
/// `dpkg-query` exits non-zero for packages it has never heard of; that is
/// an ordinary "not installed" answer, not an error.
pub fn is_installed(package: &str) -> Result<bool> {
    let output = runner::capture("dpkg-query", &["-W", "-f=${Status}", package])?;
    if !output.success {
        return Ok(false);
    }
    Ok(status_is_installed(&output.stdout))
}

/// Parse a dpkg `${Status}` field.
///
/// The field is "want flag status"; only a final "installed" counts.
/// Half-configured or config-files-only states do not.
pub fn status_is_installed(status: &str) -> bool {
    status
        .split_whitespace()
        .last()
        .is_some_and(|state| state == "installed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_installed() {
        assert!(status_is_installed("install ok installed"));
        assert!(status_is_installed("hold ok installed\n"));
    }

    #[test]
    fn test_status_not_installed() {
        assert!(!status_is_installed("deinstall ok config-files"));
        assert!(!status_is_installed("install ok unpacked"));
        assert!(!status_is_installed("install ok half-configured"));
        assert!(!status_is_installed(""));
    }

    #[test]
    fn test_is_installed_unknown_package() {
        // dpkg-query may be missing entirely on non-Debian test machines;
        // either way an unknown package must not report installed
        match is_installed("this-package-does-not-exist-12345") {
            Ok(installed) => assert!(!installed),
            Err(_) => {} // dpkg-query not available in test environment
        }
    }
}
