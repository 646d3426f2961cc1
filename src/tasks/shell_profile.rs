//! Fish shell profile setup.
//!
//! Writes the fish `config.fish` for the target user (prompt, silenced
//! greeting, `~/.local/bin` on PATH, one alias) and changes the user's login
//! shell. Overwrites any existing profile in place — this tool owns that
//! file on the machines it provisions.

use crate::config::SetupConfig;
use crate::error::Result;
use crate::runner;
use tracing::info;

/// Render the fish profile for the target user.
pub fn render_profile(config: &SetupConfig) -> String {
    format!(
        r#"# managed by debsetup
set -g fish_greeting ""

function fish_prompt
    set_color brgreen
    echo -n {user}
    set_color normal
    echo -n "@"(prompt_pwd)" > "
end

fish_add_path {home}/.local/bin

alias ll="ls -lah"
"#,
        user = config.target_user,
        home = config.home_dir.display(),
    )
}

/// Write the profile to the user's fish config path.
pub fn write_profile(config: &SetupConfig) -> Result<()> {
    let path = config.fish_config_path();
    runner::write_file(&path, &render_profile(config))
}

/// Full handler: write the profile, then change the login shell.
/// The shell change needs elevated privilege; preflight enforces EUID 0.
pub fn run(config: &SetupConfig) -> Result<()> {
    write_profile(config)?;

    let shell = config.login_shell.display().to_string();
    runner::run("chsh", &["-s", &shell, &config.target_user], &[])?;

    info!(
        "Shell profile written and login shell set to {} for {}",
        shell, config.target_user
    );
    Ok(())
}
