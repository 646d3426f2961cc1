//! Interactive menu dispatcher.
//!
//! Prints the numbered menu, reads a single choice from standard input, and
//! routes to one handler. One read, one action: the tool exits after the
//! handler finishes. Quit produces no further output; an unrecognized
//! choice is an error the caller turns into exit code 1.

use crate::config::SetupConfig;
use crate::error::{Result, SetupError};
use crate::tasks;
use std::io::BufRead;
use strum::{Display, EnumIter, IntoEnumIterator};

/// One menu entry. Discriminants are the menu numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumIter)]
pub enum MenuAction {
    #[strum(serialize = "Configure fish shell profile")]
    ShellProfile = 1,
    #[strum(serialize = "Set up third-party repositories and install base packages")]
    ReposAndPackages = 2,
    #[strum(serialize = "Install Flatpak applications")]
    Flatpak = 3,
    #[strum(serialize = "Install VirtualBox")]
    VirtualBox = 4,
    #[strum(serialize = "Switch desktop environment")]
    DesktopSwitch = 5,
    #[strum(serialize = "Install Zen browser from a downloaded archive")]
    BrowserArchive = 6,
    #[strum(serialize = "Quit")]
    Quit = 7,
}

impl MenuAction {
    /// Map a raw input line to an action.
    pub fn from_choice(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ShellProfile),
            "2" => Some(Self::ReposAndPackages),
            "3" => Some(Self::Flatpak),
            "4" => Some(Self::VirtualBox),
            "5" => Some(Self::DesktopSwitch),
            "6" => Some(Self::BrowserArchive),
            "7" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Print the menu to stdout.
pub fn print_menu() {
    println!("debsetup — workstation provisioning");
    println!();
    for action in MenuAction::iter() {
        println!("  {}) {}", action as u8, action);
    }
    println!();
    print!("Choice: ");
    use std::io::Write;
    std::io::stdout().flush().ok();
}

/// Read one choice line from the given input.
pub fn read_choice(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}

/// Execute a single menu action against the given context.
pub fn run_action(action: MenuAction, config: &SetupConfig) -> Result<()> {
    match action {
        MenuAction::ShellProfile => tasks::shell_profile::run(config),
        MenuAction::ReposAndPackages => {
            tasks::repos::configure_all(config)?;
            tasks::packages::install_base(config)
        }
        MenuAction::Flatpak => tasks::flatpak::run(config),
        MenuAction::VirtualBox => tasks::virtualbox::run(config),
        MenuAction::DesktopSwitch => tasks::desktop::run(config, None),
        MenuAction::BrowserArchive => tasks::browser::install(config),
        MenuAction::Quit => Ok(()),
    }
}

/// Show the menu once and dispatch the chosen action.
pub fn run(config: &SetupConfig) -> Result<()> {
    print_menu();
    let line = read_choice(&mut std::io::stdin().lock())?;

    match MenuAction::from_choice(&line) {
        Some(action) => run_action(action, config),
        None => Err(SetupError::validation(format!(
            "unrecognized menu choice: {}",
            line.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_choice_all_options() {
        assert_eq!(MenuAction::from_choice("1"), Some(MenuAction::ShellProfile));
        assert_eq!(MenuAction::from_choice("2"), Some(MenuAction::ReposAndPackages));
        assert_eq!(MenuAction::from_choice("3"), Some(MenuAction::Flatpak));
        assert_eq!(MenuAction::from_choice("4"), Some(MenuAction::VirtualBox));
        assert_eq!(MenuAction::from_choice("5"), Some(MenuAction::DesktopSwitch));
        assert_eq!(MenuAction::from_choice("6"), Some(MenuAction::BrowserArchive));
        assert_eq!(MenuAction::from_choice("7"), Some(MenuAction::Quit));
    }

    #[test]
    fn test_from_choice_trims_whitespace() {
        assert_eq!(MenuAction::from_choice(" 7\n"), Some(MenuAction::Quit));
    }

    #[test]
    fn test_from_choice_rejects_out_of_range() {
        assert_eq!(MenuAction::from_choice("0"), None);
        assert_eq!(MenuAction::from_choice("9"), None);
        assert_eq!(MenuAction::from_choice(""), None);
        assert_eq!(MenuAction::from_choice("quit"), None);
    }

    #[test]
    fn test_menu_numbers_match_discriminants() {
        for (index, action) in MenuAction::iter().enumerate() {
            assert_eq!(action as usize, index + 1);
        }
    }

    #[test]
    fn test_quit_is_a_no_op() {
        let config = SetupConfig::for_user("alice", "/home/alice");
        assert!(run_action(MenuAction::Quit, &config).is_ok());
    }

    #[test]
    fn test_read_choice() {
        let mut input = std::io::Cursor::new(b"4\n".to_vec());
        assert_eq!(read_choice(&mut input).unwrap(), "4\n");
    }
}
