//! Desktop environment switching.
//!
//! Queries dpkg state for both metapackages, asks the operator which
//! environment they want, purges the other one only if it is actually
//! installed, then installs the chosen metapackage. The switch is not
//! verified post-hoc; a reboot finishes it.

use crate::config::SetupConfig;
use crate::error::{Result, SetupError};
use crate::{apt, runner};
use std::io::BufRead;
use strum::{Display, EnumIter, EnumString};
use tracing::info;

/// Selectable desktop environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DesktopEnvironment {
    #[strum(serialize = "gnome")]
    Gnome,
    #[strum(serialize = "kde")]
    Kde,
}

impl DesktopEnvironment {
    /// Debian metapackage for this environment.
    pub fn metapackage(&self) -> &'static str {
        match self {
            Self::Gnome => "gnome",
            Self::Kde => "kde-plasma-desktop",
        }
    }

    /// The environment being switched away from.
    pub fn other(&self) -> Self {
        match self {
            Self::Gnome => Self::Kde,
            Self::Kde => Self::Gnome,
        }
    }
}

/// What a switch will actually do, computed from observed dpkg state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPlan {
    /// Metapackage to install
    pub install: &'static str,
    /// Metapackage to purge first, if the other environment is installed
    pub purge: Option<&'static str>,
}

/// Compute the switch plan. Purge only what is actually installed.
pub fn plan_switch(choice: DesktopEnvironment, other_installed: bool) -> SwitchPlan {
    SwitchPlan {
        install: choice.metapackage(),
        purge: other_installed.then(|| choice.other().metapackage()),
    }
}

/// Parse the two-option prompt answer ("1" = GNOME, "2" = KDE Plasma).
pub fn parse_environment_choice(input: &str) -> Option<DesktopEnvironment> {
    match input.trim() {
        "1" => Some(DesktopEnvironment::Gnome),
        "2" => Some(DesktopEnvironment::Kde),
        _ => None,
    }
}

/// Prompt the operator for an environment on the given input.
pub fn prompt_choice(reader: &mut impl BufRead) -> Result<DesktopEnvironment> {
    println!("Which desktop environment?");
    println!("  1) GNOME");
    println!("  2) KDE Plasma");

    let mut line = String::new();
    reader.read_line(&mut line)?;

    parse_environment_choice(&line)
        .ok_or_else(|| SetupError::validation(format!("unrecognized choice: {}", line.trim())))
}

/// Full handler. With `choice` unset, asks on stdin.
pub fn run(config: &SetupConfig, choice: Option<DesktopEnvironment>) -> Result<()> {
    let choice = match choice {
        Some(choice) => choice,
        None => prompt_choice(&mut std::io::stdin().lock())?,
    };

    switch_to(config, choice)
}

/// Switch to the chosen environment.
pub fn switch_to(_config: &SetupConfig, choice: DesktopEnvironment) -> Result<()> {
    let other = choice.other();
    let other_installed = apt::is_installed(other.metapackage())?;
    let plan = plan_switch(choice, other_installed);

    info!(
        "Switching desktop environment to {} (purge {:?})",
        choice, plan.purge
    );

    if let Some(purge) = plan.purge {
        apt::purge(&[purge])?;
        apt::autoremove()?;
    }
    apt::install(&[plan.install])?;

    if !runner::is_dry_run() {
        println!("Desktop environment switched to {}. Reboot to finish.", choice);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_neither_installed() {
        // Fresh machine, GNOME chosen: install the metapackage, purge nothing
        let plan = plan_switch(DesktopEnvironment::Gnome, false);
        assert_eq!(plan.install, "gnome");
        assert_eq!(plan.purge, None);
    }

    #[test]
    fn test_plan_purges_installed_other() {
        let plan = plan_switch(DesktopEnvironment::Gnome, true);
        assert_eq!(plan.install, "gnome");
        assert_eq!(plan.purge, Some("kde-plasma-desktop"));

        let plan = plan_switch(DesktopEnvironment::Kde, true);
        assert_eq!(plan.install, "kde-plasma-desktop");
        assert_eq!(plan.purge, Some("gnome"));
    }

    #[test]
    fn test_parse_environment_choice() {
        assert_eq!(parse_environment_choice("1"), Some(DesktopEnvironment::Gnome));
        assert_eq!(parse_environment_choice(" 2\n"), Some(DesktopEnvironment::Kde));
        assert_eq!(parse_environment_choice("3"), None);
        assert_eq!(parse_environment_choice("gnome"), None);
    }

    #[test]
    fn test_prompt_choice_reads_one_line() {
        let mut input = std::io::Cursor::new(b"2\n".to_vec());
        let choice = prompt_choice(&mut input).unwrap();
        assert_eq!(choice, DesktopEnvironment::Kde);
    }

    #[test]
    fn test_environment_from_str() {
        use std::str::FromStr;
        assert_eq!(
            DesktopEnvironment::from_str("gnome").unwrap(),
            DesktopEnvironment::Gnome
        );
        assert_eq!(
            DesktopEnvironment::from_str("kde").unwrap(),
            DesktopEnvironment::Kde
        );
        assert!(DesktopEnvironment::from_str("xfce").is_err());
    }
}
