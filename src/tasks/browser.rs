//! Zen browser installation from a locally downloaded archive.
//!
//! Locates the release tarball in the downloads directory, clears and
//! recreates the install directory, extracts into it, links the launcher
//! into the binary search path, and writes the desktop entry.
//!
//! Archive selection is strict: zero matches fails before any mutation,
//! and more than one match is refused with the full candidate list —
//! directory enumeration order is not a tie-breaker anyone chose.

use crate::config::SetupConfig;
use crate::error::{Result, SetupError};
use crate::runner;
use std::path::{Path, PathBuf};
use tracing::info;

/// Archive name pattern: `zen*.tar.xz` in the downloads directory.
pub const ARCHIVE_PREFIX: &str = "zen";
pub const ARCHIVE_SUFFIX: &str = ".tar.xz";

/// Find exactly one matching archive in `dir`.
///
/// - zero matches: error, nothing mutated
/// - one match: returned
/// - several matches: refused, candidates listed in sorted order
pub fn find_archive(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        SetupError::archive(format!("Cannot read downloads directory {}: {}", dir.display(), e))
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_SUFFIX)
                })
        })
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(SetupError::archive(format!(
            "No {}*{} archive found in {}",
            ARCHIVE_PREFIX,
            ARCHIVE_SUFFIX,
            dir.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(SetupError::archive(format!(
            "Multiple matching archives in {}, refusing to guess: {}",
            dir.display(),
            matches
                .iter()
                .map(|p| p.file_name().unwrap_or_default().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Render the desktop entry with resolved Exec/Icon paths.
pub fn render_desktop_entry(exec: &Path, icon: &Path) -> String {
    format!(
        r#"[Desktop Entry]
Version=1.0
Name=Zen Browser
Comment=Experience tranquillity while browsing the web
Exec={exec} %u
Icon={icon}
Terminal=false
Type=Application
MimeType=text/html;x-scheme-handler/http;x-scheme-handler/https;
Categories=Network;WebBrowser;
StartupWMClass=zen
"#,
        exec = exec.display(),
        icon = icon.display(),
    )
}

/// Full handler: locate, extract, link, register.
pub fn install(config: &SetupConfig) -> Result<()> {
    let archive = find_archive(&config.downloads_dir)?;
    info!("Installing Zen browser from {}", archive.display());

    let install_dir = config.install_prefix.join("zen");
    runner::remove_dir_all_best_effort(&install_dir);
    runner::ensure_dir(&install_dir)?;

    let archive_str = archive.display().to_string();
    let dir_str = install_dir.display().to_string();
    runner::run(
        "tar",
        &["-xaf", &archive_str, "-C", &dir_str, "--strip-components=1"],
        &[],
    )?;

    let launcher = install_dir.join("zen");
    runner::symlink(&launcher, &config.bin_dir.join("zen"))?;

    let icon = install_dir.join("browser/chrome/icons/default/default128.png");
    runner::write_file(
        &config.applications_dir.join("zen.desktop"),
        &render_desktop_entry(&launcher, &icon),
    )?;

    info!("Zen browser installed to {}", install_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_find_archive_none() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "other.tar.xz");
        touch(dir.path(), "zen.notes.txt");

        let err = find_archive(dir.path()).unwrap_err();
        assert!(matches!(err, SetupError::Archive(_)));
    }

    #[test]
    fn test_find_archive_one() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "zen.linux-x86_64.tar.xz");
        touch(dir.path(), "unrelated.tar.gz");

        let archive = find_archive(dir.path()).unwrap();
        assert_eq!(
            archive.file_name().unwrap().to_str().unwrap(),
            "zen.linux-x86_64.tar.xz"
        );
    }

    #[test]
    fn test_find_archive_many_refuses_with_candidates() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "zen-1.0.tar.xz");
        touch(dir.path(), "zen-1.1.tar.xz");

        let err = find_archive(dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("zen-1.0.tar.xz"));
        assert!(message.contains("zen-1.1.tar.xz"));
        assert!(message.contains("refusing"));
    }

    #[test]
    fn test_install_without_archive_mutates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SetupConfig::for_user("alice", "/home/alice");
        config.downloads_dir = dir.path().join("downloads");
        config.install_prefix = dir.path().join("opt");
        config.bin_dir = dir.path().join("bin");
        config.applications_dir = dir.path().join("applications");
        std::fs::create_dir_all(&config.downloads_dir).unwrap();

        assert!(install(&config).is_err());
        assert!(!config.install_prefix.exists());
        assert!(!config.bin_dir.exists());
        assert!(!config.applications_dir.exists());
    }

    #[test]
    fn test_render_desktop_entry_paths() {
        let entry = render_desktop_entry(
            Path::new("/opt/zen/zen"),
            Path::new("/opt/zen/browser/chrome/icons/default/default128.png"),
        );
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=/opt/zen/zen %u\n"));
        assert!(entry.contains("Icon=/opt/zen/browser/chrome/icons/default/default128.png\n"));
        assert!(entry.contains("Categories=Network;WebBrowser;\n"));
    }
}
