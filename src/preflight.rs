//! Pre-flight sanity checks for the runtime environment
//!
//! Verifies the host before the menu starts:
//! - Required runtime binaries are present
//! - Running with root privileges (EUID 0)
//!
//! If any check fails, the program exits with a clear error message before
//! any handler gets a chance to half-mutate the system.

use crate::runner::binary_exists;
use tracing::{debug, info, warn};

/// Result of environment verification
#[derive(Debug)]
pub struct PreflightResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
}

impl PreflightResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.is_root
    }
}

/// Required runtime binaries for provisioning
const REQUIRED_BINARIES: &[&str] = &[
    "apt-get",     // Package transactions (apt)
    "dpkg-query",  // Installed-state queries (dpkg)
    "curl",        // Key/list/installer fetches
    "tar",         // Browser archive extraction
    "chsh",        // Login shell change (passwd)
    "sh",          // Vendor installer scripts
];

/// Optional binaries (warn if missing but don't fail)
const OPTIONAL_BINARIES: &[&str] = &[
    "flatpak", // Installed by the Flatpak handler itself when absent
];

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Perform all sanity checks and return the result
pub fn verify_environment() -> PreflightResult {
    let mut missing = Vec::new();

    for binary in REQUIRED_BINARIES {
        if !binary_exists(binary) {
            missing.push((*binary).to_string());
        }
    }

    for binary in OPTIONAL_BINARIES {
        if !binary_exists(binary) {
            debug!("Optional binary not found: {}", binary);
        }
    }

    PreflightResult {
        missing_binaries: missing,
        is_root: is_running_as_root(),
    }
}

/// Print a readable error report to stderr and exit
pub fn print_error_and_exit(result: &PreflightResult) -> ! {
    eprintln!();
    eprintln!("debsetup: pre-flight check failed");
    eprintln!();

    if !result.is_root {
        eprintln!("  error: root privileges required");
        eprintln!("         package and file mutations need EUID 0; run with sudo:");
        eprintln!("           sudo debsetup");
        eprintln!();
    }

    if !result.missing_binaries.is_empty() {
        eprintln!("  error: missing required binaries");
        for binary in &result.missing_binaries {
            eprintln!(
                "         {} (package: {})",
                binary,
                get_package_for_binary(binary)
            );
        }
        let packages: Vec<&str> = result
            .missing_binaries
            .iter()
            .map(|b| get_package_for_binary(b))
            .collect();
        eprintln!();
        eprintln!("         apt-get install {}", packages.join(" "));
        eprintln!();
    }

    std::process::exit(1);
}

/// Map binary names to their Debian package names
fn get_package_for_binary(binary: &str) -> &'static str {
    match binary {
        "apt-get" => "apt",
        "dpkg-query" => "dpkg",
        "curl" => "curl",
        "tar" => "tar",
        "chsh" => "passwd",
        "sh" => "dash",
        "flatpak" => "flatpak",
        _ => "unknown",
    }
}

/// Skip root check (for development/testing)
/// Set DEBSETUP_SKIP_ROOT_CHECK=1 to skip
pub fn should_skip_root_check() -> bool {
    std::env::var("DEBSETUP_SKIP_ROOT_CHECK")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Verify the environment and exit if checks fail.
/// Call this before the menu is shown.
pub fn run_preflight_checks(skip_root: bool) {
    debug!("Running pre-flight sanity checks (skip_root={})...", skip_root);

    let mut result = verify_environment();

    if skip_root || should_skip_root_check() {
        warn!("Root check skipped");
        result.is_root = true;
    }

    if !result.is_ok() {
        print_error_and_exit(&result);
    }

    info!("Pre-flight checks passed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_exists_sh() {
        // sh should always exist
        assert!(binary_exists("sh"), "sh should be available");
    }

    #[test]
    fn test_verify_environment_runs() {
        // Not asserting on contents: test machines may lack apt entirely.
        // The check itself must not panic.
        let result = verify_environment();
        let _ = result.is_ok();
    }

    #[test]
    fn test_package_mapping() {
        assert_eq!(get_package_for_binary("apt-get"), "apt");
        assert_eq!(get_package_for_binary("dpkg-query"), "dpkg");
        assert_eq!(get_package_for_binary("chsh"), "passwd");
    }

    #[test]
    fn test_preflight_result_is_ok() {
        let ok_result = PreflightResult {
            missing_binaries: vec![],
            is_root: true,
        };
        assert!(ok_result.is_ok());

        let missing_binary = PreflightResult {
            missing_binaries: vec!["curl".to_string()],
            is_root: true,
        };
        assert!(!missing_binary.is_ok());

        let not_root = PreflightResult {
            missing_binaries: vec![],
            is_root: false,
        };
        assert!(!not_root.is_ok());
    }
}
