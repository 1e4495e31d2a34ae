//! `itemvault edit` — interactive item session.
//!
//! Shows the item, offers the actions that fit the current mode, and
//! repeats until the dialog is closed or the item is gone.  The data
//! file is rewritten after every change that reaches the store.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use zeroize::Zeroizing;

use super::terminal_editor;
use crate::app::{AppState, MemoryApp};
use crate::audit::ItemEvent;
use crate::cli::output;
use crate::cli::{log_audit, open_app, resolve_item, Cli};
use crate::editor::{format_size, AttachOutcome, ItemEditor, ItemView};
use crate::errors::{ItemVaultError, Result};
use crate::model::FieldType;
use crate::router::SessionRouter;

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let (settings, path, mut app) = open_app(cli)?;
    let item_id = resolve_item(&app, id)?;

    let router = Rc::new(RefCell::new(SessionRouter::new()));
    let mut editor = terminal_editor(&mut app, &settings, &router);
    editor.show(&item_id)?;

    let mut session = Session {
        editor,
        router,
        data_path: path,
        reveal: settings.reveal_secrets,
        seen: 0,
    };
    session.run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    // viewing
    Copy,
    ToggleReveal,
    Edit,
    EditField,
    Move,
    Attach,
    DeleteAttachment,
    Delete,
    Close,
    // editing
    Rename,
    Tags,
    AddField,
    RemoveField,
    Generate,
    RenameAttachment,
    Save,
    Cancel,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Copy => "Copy field",
            Action::ToggleReveal => "Show/hide secret values",
            Action::Edit => "Edit",
            Action::EditField => "Edit field",
            Action::Move => "Move to vault",
            Action::Attach => "Attach file",
            Action::DeleteAttachment => "Delete attachment",
            Action::Delete => "Delete item",
            Action::Close => "Close",
            Action::Rename => "Rename item",
            Action::Tags => "Edit tags",
            Action::AddField => "Add field",
            Action::RemoveField => "Remove field",
            Action::Generate => "Generate value",
            Action::RenameAttachment => "Rename attachment",
            Action::Save => "Save",
            Action::Cancel => "Cancel",
        }
    }

    /// The actions the view offers right now.
    fn available(view: &ItemView) -> Vec<Action> {
        let has_fields = !view.fields.is_empty();
        let has_attachments = !view.attachments.is_empty();
        let mut actions = Vec::new();

        if view.editing {
            actions.extend([Action::Rename, Action::Tags]);
            if has_fields {
                actions.extend([Action::EditField, Action::RemoveField, Action::Generate]);
            }
            actions.push(Action::AddField);
            if has_attachments {
                actions.push(Action::RenameAttachment);
            }
            actions.extend([Action::Save, Action::Cancel]);
            return actions;
        }

        if has_fields {
            actions.extend([Action::Copy, Action::ToggleReveal]);
        }
        if view.actions.can_edit {
            actions.push(Action::Edit);
            if has_fields {
                actions.push(Action::EditField);
            }
            actions.push(Action::Move);
        }
        if view.actions.can_attach {
            actions.push(Action::Attach);
            if has_attachments {
                actions.push(Action::DeleteAttachment);
            }
        }
        if view.actions.can_delete {
            actions.push(Action::Delete);
        }
        actions.push(Action::Close);
        actions
    }
}

struct Session<'a> {
    editor: ItemEditor<'a, MemoryApp>,
    router: Rc<RefCell<SessionRouter>>,
    data_path: PathBuf,
    reveal: bool,
    /// Router entries already acted on.
    seen: usize,
}

impl Session<'_> {
    fn run(&mut self) -> Result<()> {
        loop {
            let Some(view) = self.editor.render() else {
                output::warning("The item is no longer available.");
                return Ok(());
            };
            println!();
            output::print_item_view(&view, self.reveal);

            let actions = Action::available(&view);
            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("What would you like to do?")
                .items(&labels)
                .default(0)
                .interact_opt()
                .map_err(prompt_failed)?;

            // Esc leaves editing first, then closes.
            let action = match choice {
                Some(i) => actions[i],
                None if view.editing => Action::Cancel,
                None => Action::Close,
            };

            match self.apply(action, &view) {
                Ok(()) => {}
                Err(e @ ItemVaultError::CommandFailed(_)) => return Err(e),
                Err(e) => output::error(&e.to_string()),
            }

            if !self.follow_router()? || !self.editor.is_open() {
                return Ok(());
            }
        }
    }

    /// Act on navigation requested by the editor.
    ///
    /// Returns `false` when the session should end.
    fn follow_router(&mut self) -> Result<bool> {
        let next = {
            let router = self.router.borrow();
            if router.history().len() == self.seen {
                return Ok(true);
            }
            self.seen = router.history().len();
            router.current_item().map(str::to_string)
        };

        match next {
            Some(id) => {
                if self.editor.item_id() != Some(id.as_str()) {
                    self.editor.show(&id)?;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the data file and record the event.
    fn persist(
        &self,
        event: ItemEvent,
        vault: &str,
        item: (&str, &str),
        detail: Option<&str>,
    ) -> Result<()> {
        self.editor.app().save(&self.data_path)?;
        log_audit(&self.data_path, event, vault, item, detail);
        Ok(())
    }

    fn apply(&mut self, action: Action, view: &ItemView) -> Result<()> {
        match action {
            Action::Copy => {
                if let Some(i) = pick_field(view, "Copy which field?")? {
                    self.editor.copy_field(i)?;
                    output::success(&format!("Copied '{}' to the clipboard", view.fields[i].name));
                }
            }
            Action::ToggleReveal => self.reveal = !self.reveal,
            Action::Edit => self.editor.edit(),
            Action::EditField => {
                if let Some(i) = pick_field(view, "Edit which field?")? {
                    self.editor.edit_field(i);
                    self.edit_field(i)?;
                }
            }
            Action::Move => {
                if let Some(new_id) = self.editor.move_item()? {
                    let target = self
                        .editor
                        .app()
                        .get_item(&new_id)
                        .map(|(_, v)| v.name.clone())
                        .unwrap_or_default();
                    self.persist(
                        ItemEvent::Moved,
                        &view.vault_name,
                        (&new_id, &view.name),
                        Some(&target),
                    )?;
                    output::success(&format!("Moved '{}' to {target}", view.name));
                }
            }
            Action::Attach => {
                let path = prompt_text("File to attach", "")?;
                if let AttachOutcome::Uploaded(info) = self.editor.attach_path(Path::new(path.trim()))? {
                    self.persist(
                        ItemEvent::Attached,
                        &view.vault_name,
                        (&view.item_id, &view.name),
                        Some(&info.name),
                    )?;
                    output::success(&format!(
                        "Attached '{}' ({})",
                        info.name,
                        format_size(info.size)
                    ));
                }
            }
            Action::DeleteAttachment => {
                if let Some(i) = pick_attachment(view, "Delete which attachment?")? {
                    let att = &view.attachments[i];
                    if self.editor.delete_attachment(&att.id)? {
                        self.persist(
                            ItemEvent::AttachmentDeleted,
                            &view.vault_name,
                            (&view.item_id, &view.name),
                            Some(&att.name),
                        )?;
                        output::success(&format!("Deleted attachment '{}'", att.name));
                    }
                }
            }
            Action::Delete => {
                if self.editor.delete_item()? {
                    self.persist(
                        ItemEvent::Deleted,
                        &view.vault_name,
                        (&view.item_id, &view.name),
                        None,
                    )?;
                    output::success(&format!("Deleted item '{}'", view.name));
                }
            }
            Action::Close => self.editor.dismiss(),
            Action::Rename => {
                let name = prompt_text("Name", self.editor.staged().name())?;
                if let Some(staged) = self.editor.staged_mut() {
                    staged.set_name(name);
                }
            }
            Action::Tags => {
                let current = self.editor.staged().tags().join(", ");
                let input = prompt_text("Tags (comma separated)", &current)?;
                if let Some(staged) = self.editor.staged_mut() {
                    staged.set_tags(input.split(','));
                }
            }
            Action::AddField => {
                self.editor.add_default_field();
                let index = self.editor.staged().fields().len() - 1;
                self.edit_field(index)?;
            }
            Action::RemoveField => {
                if let Some(i) = pick_field(view, "Remove which field?")? {
                    self.editor.remove_field(i);
                }
            }
            Action::Generate => {
                if let Some(i) = pick_field(view, "Generate a value for which field?")? {
                    if self.editor.generate_value(i)? {
                        output::success("Generated a new value");
                    }
                }
            }
            Action::RenameAttachment => {
                if let Some(i) = pick_attachment(view, "Rename which attachment?")? {
                    let att = &view.attachments[i];
                    let name = prompt_text("Attachment name", &att.name)?;
                    if let Some(staged) = self.editor.staged_mut() {
                        staged.rename_attachment(&att.id, name.trim());
                    }
                }
            }
            Action::Save => {
                self.editor.save()?;
                let name = self.editor.staged().name().to_string();
                self.persist(ItemEvent::Saved, &view.vault_name, (&view.item_id, &name), None)?;
                output::success(&format!("Saved '{name}'"));
            }
            Action::Cancel => self.editor.cancel_edit(),
        }
        Ok(())
    }

    /// Prompt for name, type and value of a staged field.
    fn edit_field(&mut self, index: usize) -> Result<()> {
        let Some((name, field_type, value)) = self
            .editor
            .staged()
            .fields()
            .get(index)
            .map(|f| (f.name.clone(), f.field_type, Zeroizing::new(f.value.clone())))
        else {
            return Ok(());
        };

        let name = prompt_text("Field name", &name)?;

        let types: Vec<&str> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
        let current = FieldType::ALL
            .iter()
            .position(|t| *t == field_type)
            .unwrap_or(0);
        let type_index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Field type")
            .items(&types)
            .default(current)
            .interact()
            .map_err(prompt_failed)?;
        let field_type = FieldType::ALL[type_index];

        // Secret values are typed blind; an empty answer keeps the old one.
        let new_value = if field_type.is_masked() {
            let entered = Zeroizing::new(
                Password::with_theme(&ColorfulTheme::default())
                    .with_prompt("Value (leave empty to keep)")
                    .allow_empty_password(true)
                    .interact()
                    .map_err(prompt_failed)?,
            );
            (!entered.is_empty()).then(|| entered.as_str().to_owned())
        } else {
            Some(prompt_text("Value", &value)?)
        };

        if let Some(staged) = self.editor.staged_mut() {
            staged.set_field_name(index, name)?;
            staged.set_field_type(index, field_type)?;
            if let Some(value) = new_value {
                staged.set_field_value(index, value)?;
            }
        }
        Ok(())
    }
}

fn prompt_failed(e: dialoguer::Error) -> ItemVaultError {
    ItemVaultError::CommandFailed(format!("prompt: {e}"))
}

fn prompt_text(prompt: &str, initial: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_failed)
}

fn pick_field(view: &ItemView, prompt: &str) -> Result<Option<usize>> {
    if view.fields.is_empty() {
        output::info("This item has no fields.");
        return Ok(None);
    }

    let labels: Vec<String> = view
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let name = if f.name.is_empty() {
                "<unnamed>"
            } else {
                f.name.as_str()
            };
            format!("{i}: {name} ({})", f.field_type)
        })
        .collect();

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(prompt_failed)
}

fn pick_attachment(view: &ItemView, prompt: &str) -> Result<Option<usize>> {
    let labels: Vec<String> = view
        .attachments
        .iter()
        .map(|a| format!("{} ({})", a.name, a.size))
        .collect();

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(prompt_failed)
}
