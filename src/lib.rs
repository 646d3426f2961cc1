//! debsetup library
//!
//! Core functionality for the menu-driven Debian workstation provisioning
//! tool: an explicit setup context, a sanctioned host-mutation layer with
//! dry-run support, and one handler per menu action.

pub mod apt;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod menu;
pub mod preflight;
pub mod process_guard;
pub mod runner;
pub mod tasks;

// Re-export main types for convenience
pub use cli::{Cli, Commands};
pub use config::SetupConfig;
pub use error::{Result, SetupError};
pub use menu::MenuAction;
pub use process_guard::{ChildRegistry, CommandProcessGroup};
pub use runner::{is_dry_run, set_dry_run, CommandOutput};
pub use tasks::browser::find_archive;
pub use tasks::desktop::{plan_switch, DesktopEnvironment, SwitchPlan};
pub use tasks::repos::{pin_signed_by, AptRepo};
