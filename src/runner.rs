//! Sanctioned host-mutation layer.
//!
//! This module provides the ONLY sanctioned way to run host commands and
//! write system files. All host mutations MUST go through these functions
//! to ensure:
//!
//! - Process group isolation and PID registration for cleanup
//! - A single dry-run gate: mutating operations are logged and skipped,
//!   read-only probes still execute so previews are realistic
//!
//! # Architecture Rule
//!
//! Handlers never call `Command::new` or `fs::write` directly for host
//! state. Doing so bypasses both the dry-run gate and the child registry.

use crate::error::{Result, SetupError};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

static DRY_RUN: AtomicBool = AtomicBool::new(false);

/// Enable or disable dry-run mode for the whole process.
pub fn set_dry_run(enabled: bool) {
    DRY_RUN.store(enabled, Ordering::SeqCst);
}

/// Whether dry-run mode is active.
pub fn is_dry_run() -> bool {
    DRY_RUN.load(Ordering::SeqCst)
}

/// Output from a completed command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Whether the command exited successfully (exit code 0)
    pub success: bool,
}

impl CommandOutput {
    /// Check that the command succeeded and return an error if not.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            let code = self.exit_code.unwrap_or(-1);
            Err(SetupError::command(format!(
                "{} failed (exit code {}): {}",
                context,
                code,
                self.stderr.trim()
            )))
        }
    }
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Spawn a command, wait for it, and capture its output.
/// PID is registered with the global child registry for the duration.
fn spawn_and_wait(mut cmd: Command, cmdline: &str) -> Result<CommandOutput> {
    let child = cmd
        .spawn()
        .map_err(|e| SetupError::command(format!("Failed to spawn {}: {}", cmdline, e)))?;
    let pid = child.id();

    {
        let registry = ChildRegistry::global();
        let mut guard = registry.lock().expect("ChildRegistry mutex poisoned");
        guard.register(pid);
    }

    let output = child.wait_with_output();

    {
        let registry = ChildRegistry::global();
        let mut guard = registry.lock().expect("ChildRegistry mutex poisoned");
        guard.unregister(pid);
    }

    let output =
        output.map_err(|e| SetupError::command(format!("Failed waiting for {}: {}", cmdline, e)))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
        success: output.status.success(),
    })
}

/// Run a read-only probe and capture its output.
///
/// Probes execute even in dry-run mode. Callers inspect the output or call
/// [`CommandOutput::ensure_success`].
pub fn capture(program: &str, args: &[&str]) -> Result<CommandOutput> {
    let cmdline = render(program, args);
    debug!("capture: {}", cmdline);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .in_new_process_group();

    spawn_and_wait(cmd, &cmdline)
}

/// Run a mutating command with captured output; non-zero exit is an error.
/// Skipped in dry-run mode.
pub fn run(program: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<()> {
    let cmdline = render(program, args);
    if is_dry_run() {
        info!("[dry-run] would run: {}", cmdline);
        return Ok(());
    }
    info!("run: {}", cmdline);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .in_new_process_group();
    for (key, value) in envs {
        cmd.env(key, value);
    }

    spawn_and_wait(cmd, &cmdline)?.ensure_success(&cmdline)
}

/// Run a mutating command with the operator's terminal attached.
///
/// Used for long package-manager transactions and interactive vendor
/// installers, where progress output belongs on the operator's screen.
/// Skipped in dry-run mode.
pub fn run_interactive(program: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<()> {
    let cmdline = render(program, args);
    if is_dry_run() {
        info!("[dry-run] would run: {}", cmdline);
        return Ok(());
    }
    info!("run: {}", cmdline);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .in_new_process_group();
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let output = spawn_and_wait(cmd, &cmdline)?;
    if output.success {
        Ok(())
    } else {
        Err(SetupError::command(format!(
            "{} failed (exit code {})",
            cmdline,
            output.exit_code.unwrap_or(-1)
        )))
    }
}

/// Run a mutating command where failure is acceptable; a non-zero exit is
/// logged and swallowed. Skipped in dry-run mode.
pub fn run_best_effort(program: &str, args: &[&str], envs: &[(&str, &str)]) {
    let cmdline = render(program, args);
    if is_dry_run() {
        info!("[dry-run] would run (best effort): {}", cmdline);
        return;
    }

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .in_new_process_group();
    for (key, value) in envs {
        cmd.env(key, value);
    }

    match spawn_and_wait(cmd, &cmdline) {
        Ok(output) if output.success => info!("{} succeeded", cmdline),
        Ok(output) => info!(
            "{} failed (exit code {}), continuing",
            cmdline,
            output.exit_code.unwrap_or(-1)
        ),
        Err(e) => info!("{} could not run ({}), continuing", cmdline, e),
    }
}

/// Check if a binary is available in PATH. Probes execute in dry-run mode.
pub fn binary_exists(name: &str) -> bool {
    capture("which", &[name])
        .map(|output| output.success)
        .unwrap_or(false)
}

/// Write a file, overwriting any existing content. Skipped in dry-run mode.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if is_dry_run() {
        info!("[dry-run] would write {} ({} bytes)", path.display(), contents.len());
        return Ok(());
    }
    info!("write: {}", path.display());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create a directory and all parents. Skipped in dry-run mode.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if is_dry_run() {
        info!("[dry-run] would create directory {}", path.display());
        return Ok(());
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Remove a directory tree if present; absence is not an error.
/// Skipped in dry-run mode.
pub fn remove_dir_all_best_effort(path: &Path) {
    if is_dry_run() {
        info!("[dry-run] would remove directory {}", path.display());
        return;
    }
    if path.exists() {
        if let Err(e) = std::fs::remove_dir_all(path) {
            info!("Failed to remove {} ({}), continuing", path.display(), e);
        }
    }
}

/// Create (or replace) a symlink at `link` pointing to `target`.
/// Skipped in dry-run mode.
pub fn symlink(target: &Path, link: &Path) -> Result<()> {
    if is_dry_run() {
        info!(
            "[dry-run] would symlink {} -> {}",
            link.display(),
            target.display()
        );
        return Ok(());
    }
    info!("symlink: {} -> {}", link.display(), target.display());

    if let Some(parent) = link.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Replace a stale link from a previous run
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}
