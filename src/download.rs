//! Download infrastructure for vendor keys, source lists and installers.
//!
//! Fetches go through `curl` like every other host command; integrity
//! checking is done in-process with SHA-256. Anything that will be
//! *executed* (installer scripts, vendor `.run` binaries) must be fetched
//! through [`fetch_verified`] with a pinned digest — transport encryption
//! alone is not an integrity check.

use crate::error::{Result, SetupError};
use crate::runner;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Compute the SHA-256 digest of a file as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Check a file against an expected SHA-256 digest.
/// On mismatch the file is removed so a corrupt download cannot be re-used.
pub fn verify_file(path: &Path, expected_sha256: &str) -> Result<()> {
    let actual = sha256_file(path)?;
    let expected = expected_sha256.to_lowercase();

    if actual != expected {
        std::fs::remove_file(path).ok();
        return Err(SetupError::checksum(expected, actual));
    }

    Ok(())
}

/// Fetch a URL to a destination path. Skipped in dry-run mode.
pub fn fetch(url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        runner::ensure_dir(parent)?;
    }

    let dest_str = dest
        .to_str()
        .ok_or_else(|| SetupError::download(format!("Destination is not UTF-8: {:?}", dest)))?;

    runner::run("curl", &["-fsSL", "-o", dest_str, url], &[])
        .map_err(|e| SetupError::download(format!("{}: {}", url, e)))
}

/// Fetch a URL and return the body as a string. Runs even in dry-run mode
/// (a fetch into memory mutates nothing).
pub fn fetch_string(url: &str) -> Result<String> {
    let output = runner::capture("curl", &["-fsSL", url])?;
    if !output.success {
        return Err(SetupError::download(format!(
            "{}: curl exited with code {}: {}",
            url,
            output.exit_code.unwrap_or(-1),
            output.stderr.trim()
        )));
    }
    Ok(output.stdout)
}

/// Fetch a URL to a destination path and verify it against a pinned digest.
///
/// This is the required path for anything that will be executed. In dry-run
/// mode nothing is downloaded, so verification is skipped too.
pub fn fetch_verified(url: &str, dest: &Path, expected_sha256: &str) -> Result<()> {
    fetch(url, dest)?;

    if runner::is_dry_run() {
        info!("[dry-run] would verify {} against pinned digest", dest.display());
        return Ok(());
    }

    verify_file(dest, expected_sha256)?;
    info!("Verified {} ({})", dest.display(), &expected_sha256[..12]);
    Ok(())
}
