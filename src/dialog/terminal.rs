//! Terminal implementations of the dialogs, built on dialoguer.

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};

use super::{
    Alert, AlertStyle, ConfirmPrompt, ConfirmRequest, ConfirmStyle, GeneratorDialog,
    MoveItemsDialog,
};
use crate::app::AppState;
use crate::cli::output;
use crate::errors::{ItemVaultError, Result};
use crate::generator::generate_password;
use crate::model::{Item, ItemLocator};

fn prompt_error(what: &str, e: dialoguer::Error) -> ItemVaultError {
    ItemVaultError::CommandFailed(format!("{what} prompt: {e}"))
}

/// Confirmation prompt offering the two labelled answers.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl ConfirmPrompt for TerminalConfirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> Result<bool> {
        if let Some(title) = &request.title {
            println!("{}", style(title).bold());
        }

        let prompt = match request.style {
            ConfirmStyle::Plain => style(&request.message),
            ConfirmStyle::Warning => style(&request.message).yellow(),
            ConfirmStyle::Destructive => style(&request.message).red().bold(),
        };

        // Default to the cancel answer; Esc also cancels.
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .items(&[&request.confirm_label, &request.cancel_label])
            .default(1)
            .interact_opt()
            .map_err(|e| prompt_error("confirm", e))?;

        Ok(choice == Some(0))
    }
}

/// Prints alerts through the CLI output helpers.
#[derive(Debug, Default)]
pub struct TerminalAlert;

impl Alert for TerminalAlert {
    fn alert(&mut self, message: &str, style: AlertStyle) -> Result<()> {
        match style {
            AlertStyle::Info => output::info(message),
            AlertStyle::Warning => output::warning(message),
        }
        Ok(())
    }
}

/// Shows generated passwords until the user accepts one or gives up.
#[derive(Debug)]
pub struct TerminalGenerator {
    pub length: usize,
}

impl GeneratorDialog for TerminalGenerator {
    fn show(&mut self) -> Result<Option<String>> {
        loop {
            let candidate = generate_password(self.length)?;
            println!("{} {}", style("Generated:").bold(), style(&candidate).cyan());

            let choice = Select::with_theme(&ColorfulTheme::default())
                .items(&["Use this value", "Generate another", "Cancel"])
                .default(0)
                .interact_opt()
                .map_err(|e| prompt_error("generator", e))?;

            match choice {
                Some(0) => return Ok(Some(candidate)),
                Some(1) => continue,
                _ => return Ok(None),
            }
        }
    }
}

/// Lets the user pick a writable target vault and moves the items there.
#[derive(Debug, Default)]
pub struct TerminalMoveDialog;

impl MoveItemsDialog for TerminalMoveDialog {
    fn show(
        &mut self,
        app: &mut dyn AppState,
        items: &[ItemLocator],
    ) -> Result<Option<Vec<Item>>> {
        let targets: Vec<(String, String)> = app
            .vaults()
            .into_iter()
            .filter(|v| app.has_write_permissions(v))
            .filter(|v| items.iter().all(|loc| loc.vault != v.id))
            .map(|v| (v.id.clone(), v.name.clone()))
            .collect();

        if targets.is_empty() {
            output::info("There is no other vault you can move this item to.");
            return Ok(None);
        }

        let labels: Vec<&str> = targets.iter().map(|(_, name)| name.as_str()).collect();
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Move {} item(s) to", items.len()))
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(|e| prompt_error("move", e))?;

        let Some(index) = choice else {
            return Ok(None);
        };

        let moved = app.move_items(items, &targets[index].0)?;
        Ok(Some(moved))
    }
}
