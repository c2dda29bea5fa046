// Command line surface and interactive form
pub mod commands;

pub use commands::{Cli, Commands};

use crate::state::ConnectionForm;
use crate::utils::error::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};

/// Apply command line values to the form; an explicit port wins over the mode default
pub fn apply_overrides(form: &mut ConnectionForm, cli: &Cli) {
    if let Some(mode) = cli.mode {
        form.select_mode(mode);
    }
    for (field, value) in [
        ("addr", &cli.addr),
        ("port", &cli.port),
        ("user", &cli.user),
        ("key", &cli.key),
    ] {
        if let Some(value) = value {
            form.update_field(field, value.clone());
        }
    }
}

/// Walk the user through the setup form.
///
/// Rows hidden by the selected mode are skipped but still collected.
pub fn prompt_form(form: &mut ConnectionForm) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("{}", style("Mosh connection").bold().cyan());

    let modes: Vec<&str> = form.mode_options.iter().map(|o| o.mode.display_str()).collect();
    let current = form.mode_options.iter().position(|o| o.checked).unwrap_or(0);
    let picked = Select::with_theme(&theme)
        .with_prompt("Mode")
        .items(&modes)
        .default(current)
        .interact()?;
    let mode = form
        .mode_options
        .get(picked)
        .map(|o| o.mode)
        .unwrap_or_default();
    if form.selected_mode() != Some(mode) {
        form.select_mode(mode);
    }

    let addr: String = Input::with_theme(&theme)
        .with_prompt("Server")
        .with_initial_text(form.addr.clone())
        .allow_empty(true)
        .interact_text()?;
    form.update_field("addr", addr);

    let port: String = Input::with_theme(&theme)
        .with_prompt("Port")
        .default(form.port.clone())
        .interact_text()?;
    form.update_field("port", port);

    if !form.username_row_hidden {
        let user: String = Input::with_theme(&theme)
            .with_prompt("Username")
            .with_initial_text(form.user.clone())
            .allow_empty(true)
            .interact_text()?;
        form.update_field("user", user);
    }

    if !form.key_row_hidden {
        let key = Password::with_theme(&theme)
            .with_prompt("Session key (MOSH_KEY)")
            .allow_empty_password(true)
            .interact()?;
        if !key.is_empty() {
            form.update_field("key", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionMode;
    use clap::Parser;

    #[test]
    fn test_overrides_keep_explicit_port() {
        let cli = Cli::try_parse_from(["mosh-launcher", "--mode", "manual", "--port", "60010", "--addr", "h"]).unwrap();
        let mut form = ConnectionForm::new();
        apply_overrides(&mut form, &cli);

        assert_eq!(form.selected_mode(), Some(ConnectionMode::Manual));
        assert_eq!(form.port, "60010");
        assert_eq!(form.addr, "h");
        assert!(form.username_row_hidden);
    }

    #[test]
    fn test_overrides_mode_default_port() {
        let cli = Cli::try_parse_from(["mosh-launcher", "--mode", "manual"]).unwrap();
        let mut form = ConnectionForm::new();
        apply_overrides(&mut form, &cli);

        assert_eq!(form.port, "60001");
        assert!(form.addr.is_empty());
    }
}
