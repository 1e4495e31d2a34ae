//! Editor module — the item dialog's view/controller logic.
//!
//! `ItemEditor` shows one item at a time and is either *viewing* it or
//! *editing* it.  Edits land in a `StagedEdit` buffer and reach the
//! store only on `save`, as a single replacement of name, fields and
//! tags.  Deleting, moving and attachments go to the store directly.
//!
//! The editor subscribes to store notifications for as long as it
//! lives and marks its view stale when the shown item, its vault or
//! the lock state changes.  The staged buffer is left alone when that
//! happens: the last local save wins.

pub mod attachments;
pub mod buffer;
pub mod view;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;

use crate::app::{AppEvent, AppState, SubscriptionId};
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::dialog::{
    Alert, ConfirmPrompt, ConfirmRequest, ConfirmStyle, DialogStack, GeneratorDialog,
    MoveItemsDialog, TerminalAlert, TerminalConfirm, TerminalGenerator, TerminalMoveDialog,
    CONFIRM_DIALOG, GENERATOR_DIALOG, ITEM_DIALOG, MOVE_ITEMS_DIALOG,
};
use crate::errors::{ItemVaultError, Result};
use crate::model::{Field, FieldType, Item, ItemLocator, Vault};
use crate::router::{item_path, Router, ITEMS_PATH};

pub use attachments::AttachOutcome;
pub use buffer::StagedEdit;
pub use view::{format_from_now, format_size, Affordances, AttachmentView, FieldView, ItemView};

/// Attachments larger than this are refused unless configured otherwise.
pub const DEFAULT_MAX_ATTACHMENT_SIZE: u64 = 5_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing,
}

/// The input that should have keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    Field(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub max_attachment_size: u64,
    /// Type of the field appended by "Add Field".
    pub default_field_type: FieldType,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_attachment_size: DEFAULT_MAX_ATTACHMENT_SIZE,
            default_field_type: FieldType::Note,
        }
    }
}

/// The collaborators the editor hands off to.
pub struct EditorHost {
    pub confirm: Box<dyn ConfirmPrompt>,
    pub alert: Box<dyn Alert>,
    pub generator: Box<dyn GeneratorDialog>,
    pub mover: Box<dyn MoveItemsDialog>,
    pub router: Box<dyn Router>,
    pub clipboard: Box<dyn Clipboard>,
}

impl EditorHost {
    /// Interactive terminal dialogs and the system clipboard.
    pub fn terminal(generator_length: usize, router: Box<dyn Router>) -> Self {
        Self {
            confirm: Box::new(TerminalConfirm),
            alert: Box::new(TerminalAlert),
            generator: Box::new(TerminalGenerator {
                length: generator_length,
            }),
            mover: Box::new(TerminalMoveDialog),
            router,
            clipboard: Box::new(SystemClipboard),
        }
    }
}

pub struct ItemEditor<'a, A: AppState> {
    app: &'a mut A,
    host: EditorHost,
    settings: EditorSettings,
    dialogs: DialogStack,

    item_id: Option<String>,
    mode: Mode,
    staged: StagedEdit,
    focus: Option<Focus>,

    /// Notifications received since the last render.
    events: Rc<RefCell<Vec<AppEvent>>>,
    stale: bool,
    subscription: SubscriptionId,
}

impl<'a, A: AppState> ItemEditor<'a, A> {
    pub fn new(app: &'a mut A, host: EditorHost, settings: EditorSettings) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = app.subscribe(Box::new(move |event: &AppEvent| {
            sink.borrow_mut().push(event.clone());
        }));

        Self {
            app,
            host,
            settings,
            dialogs: DialogStack::new(),
            item_id: None,
            mode: Mode::Viewing,
            staged: StagedEdit::default(),
            focus: None,
            events,
            stale: false,
            subscription,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn staged(&self) -> &StagedEdit {
        &self.staged
    }

    /// The staged buffer, writable only while editing.
    pub fn staged_mut(&mut self) -> Option<&mut StagedEdit> {
        match self.mode {
            Mode::Editing => Some(&mut self.staged),
            Mode::Viewing => None,
        }
    }

    pub fn dialogs(&self) -> &DialogStack {
        &self.dialogs
    }

    pub fn is_open(&self) -> bool {
        self.dialogs.is_open(ITEM_DIALOG)
    }

    pub fn is_visible(&self) -> bool {
        self.dialogs.is_visible(ITEM_DIALOG)
    }

    pub fn app(&self) -> &A {
        &*self.app
    }

    /// Direct access to the store, bypassing the editor.
    pub fn app_mut(&mut self) -> &mut A {
        &mut *self.app
    }

    /// Swap collaborators, e.g. to answer confirmations automatically.
    pub fn host_mut(&mut self) -> &mut EditorHost {
        &mut self.host
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// The shown item and its vault, looked up fresh from the store.
    pub fn current(&self) -> Option<(&Item, &Vault)> {
        self.item_id.as_deref().and_then(|id| self.app.get_item(id))
    }

    fn locator(&self) -> Result<ItemLocator> {
        let id = self.item_id.as_deref().ok_or(ItemVaultError::NoItemShown)?;
        let (item, vault) = self
            .app
            .get_item(id)
            .ok_or_else(|| ItemVaultError::ItemNotFound(id.to_string()))?;
        Ok(ItemLocator::new(&vault.id, &item.id))
    }

    fn can_write(&self) -> bool {
        self.current()
            .map(|(_, vault)| self.app.has_write_permissions(vault))
            .unwrap_or(false)
    }

    /// Replace the buffer with a fresh copy of the shown item.
    fn reload_staged(&mut self) {
        self.staged = match self.current() {
            Some((item, _)) => StagedEdit::from_item(item),
            None => StagedEdit::default(),
        };
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn is_relevant(&self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Lock | AppEvent::Unlock => true,
            AppEvent::ItemChanged { item_id } => self.item_id.as_deref() == Some(item_id.as_str()),
            AppEvent::VaultChanged { vault_id } => match self.current() {
                Some((_, vault)) => vault.id == *vault_id,
                None => self.item_id.is_some(),
            },
        }
    }

    /// Whether something the view depends on changed since the last render.
    pub fn needs_render(&self) -> bool {
        self.stale || self.events.borrow().iter().any(|e| self.is_relevant(e))
    }

    /// Build the current view.
    ///
    /// Returns `None` while the application is locked or when the item
    /// or its vault can no longer be found.
    pub fn render(&mut self) -> Option<ItemView> {
        self.events.borrow_mut().clear();
        self.stale = false;

        if self.app.is_locked() {
            return None;
        }

        let (item, vault) = self.current()?;
        let org = vault.org.as_ref().and_then(|o| self.app.get_org(&o.id));
        let readonly = !self.app.has_write_permissions(vault);

        Some(ItemView::build(
            item,
            vault,
            org,
            &self.staged,
            self.is_editing(),
            readonly,
            Utc::now(),
        ))
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Show an item: back to viewing, buffer loaded from the store,
    /// dialog visible.
    pub fn show(&mut self, item_id: &str) -> Result<()> {
        let staged = match self.app.get_item(item_id) {
            Some((item, _)) => StagedEdit::from_item(item),
            None => return Err(ItemVaultError::ItemNotFound(item_id.to_string())),
        };

        self.mode = Mode::Viewing;
        self.item_id = Some(item_id.to_string());
        self.staged = staged;
        self.focus = None;
        self.stale = true;
        self.dialogs.open(ITEM_DIALOG);
        Ok(())
    }

    /// Close the dialog.
    pub fn dismiss(&mut self) {
        self.dialogs.close(ITEM_DIALOG);
        self.focus = None;
    }

    /// Switch to editing. Does nothing without write access.
    pub fn edit(&mut self) {
        if !self.can_write() {
            return;
        }
        self.mode = Mode::Editing;
        self.focus = Some(Focus::Name);
        self.stale = true;
    }

    /// Discard staged changes and return to viewing.
    pub fn cancel_edit(&mut self) {
        self.reload_staged();
        self.mode = Mode::Viewing;
        self.focus = None;
        self.stale = true;
    }

    /// Submit the staged name, fields and tags as one update.
    ///
    /// Always ends in viewing; a store error is returned after the
    /// transition and leaves the buffer as it was.
    pub fn save(&mut self) -> Result<()> {
        let result = self.submit();
        self.mode = Mode::Viewing;
        self.focus = None;
        self.stale = true;
        result
    }

    fn submit(&mut self) -> Result<()> {
        let loc = self.locator()?;

        // (attachment id, name before the rename)
        let mut renamed = Vec::new();
        if let Some(attachments) = self.app.item_attachments_mut(&loc.item) {
            for att in attachments.iter_mut() {
                if let Some(name) = self.staged.attachment_name(&att.id) {
                    if !name.is_empty() && name != att.name {
                        let old = std::mem::replace(&mut att.name, name.to_string());
                        renamed.push((att.id.clone(), old));
                    }
                }
            }
        }

        if let Err(e) = self
            .app
            .update_item(&loc.vault, &loc.item, self.staged.to_update())
        {
            self.restore_attachment_names(&loc.item, renamed);
            return Err(e);
        }
        self.reload_staged();
        Ok(())
    }

    /// Undo attachment renames applied by a save that did not go through.
    fn restore_attachment_names(&mut self, item_id: &str, renamed: Vec<(String, String)>) {
        let Some(attachments) = self.app.item_attachments_mut(item_id) else {
            return;
        };
        for (id, old) in renamed {
            if let Some(att) = attachments.iter_mut().find(|a| a.id == id) {
                att.name = old;
            }
        }
    }

    // ------------------------------------------------------------------
    // Field actions
    // ------------------------------------------------------------------

    /// Append a field to the buffer and focus it.
    pub fn add_field(&mut self, field: Field) {
        let index = self.staged.push_field(field);
        self.focus = Some(Focus::Field(index));
        self.stale = true;
    }

    /// Append an empty field of the configured default type.
    pub fn add_default_field(&mut self) {
        self.add_field(Field::blank(self.settings.default_field_type));
    }

    pub fn remove_field(&mut self, index: usize) {
        if self.staged.remove_field(index).is_some() {
            if let Some(Focus::Field(focused)) = self.focus {
                if focused >= self.staged.fields().len() || focused == index {
                    self.focus = None;
                }
            }
            self.stale = true;
        }
    }

    /// Start editing with the given field focused. Does nothing without
    /// write access or when there is no field at `index`.
    pub fn edit_field(&mut self, index: usize) {
        if index >= self.staged.fields().len() || !self.can_write() {
            return;
        }
        self.mode = Mode::Editing;
        self.focus = Some(Focus::Field(index));
        self.stale = true;
    }

    /// Ask the generator for a value and put it into field `index`.
    ///
    /// Returns whether a value was produced.
    pub fn generate_value(&mut self, index: usize) -> Result<bool> {
        let len = self.staged.fields().len();
        if index >= len {
            return Err(ItemVaultError::FieldOutOfRange { index, len });
        }

        let generator = &mut self.host.generator;
        let value = self
            .dialogs
            .run_child(GENERATOR_DIALOG, |_| generator.show())?;

        match value {
            Some(value) if !value.is_empty() => {
                self.staged.set_field_value(index, value)?;
                self.stale = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Copy a staged field to the clipboard.
    pub fn copy_field(&mut self, index: usize) -> Result<()> {
        let id = self.item_id.as_deref().ok_or(ItemVaultError::NoItemShown)?;
        let (item, _) = self
            .app
            .get_item(id)
            .ok_or_else(|| ItemVaultError::ItemNotFound(id.to_string()))?;
        let len = self.staged.fields().len();
        let field = self
            .staged
            .fields()
            .get(index)
            .ok_or(ItemVaultError::FieldOutOfRange { index, len })?;
        self.host.clipboard.copy_field(item, field)
    }

    // ------------------------------------------------------------------
    // Item actions
    // ------------------------------------------------------------------

    /// Move the item to another vault via the move-items dialog.
    ///
    /// On success navigates to the moved item, whose id may have changed,
    /// and returns that id. Does nothing without write access.
    pub fn move_item(&mut self) -> Result<Option<String>> {
        if !self.can_write() {
            return Ok(None);
        }
        let loc = self.locator()?;

        let app: &mut dyn AppState = &mut *self.app;
        let mover = &mut self.host.mover;
        let moved = self.dialogs.run_child(MOVE_ITEMS_DIALOG, |_| {
            mover.show(app, std::slice::from_ref(&loc))
        })?;

        let Some(new_id) = moved.and_then(|items| items.first().map(|i| i.id.clone())) else {
            return Ok(None);
        };
        self.host.router.go(&item_path(&new_id));
        Ok(Some(new_id))
    }

    /// Delete the item after a destructive confirmation.
    ///
    /// The dialog is hidden while the question is asked.  Confirming
    /// deletes the item, navigates to the item list and closes the
    /// dialog; declining shows the dialog again unchanged.  Does nothing
    /// without write access.
    pub fn delete_item(&mut self) -> Result<bool> {
        if !self.can_write() {
            return Ok(false);
        }
        let loc = self.locator()?;

        let request = ConfirmRequest::new("Are you sure you want to delete this item?")
            .labels("Delete", "Cancel")
            .style(ConfirmStyle::Destructive);

        let parent = self.dialogs.suspend();
        self.dialogs.open(CONFIRM_DIALOG);
        let answer = self.host.confirm.confirm(&request);
        self.dialogs.close(CONFIRM_DIALOG);

        let resume = |dialogs: &mut DialogStack| {
            if let Some(parent) = parent {
                dialogs.resume(parent);
            }
        };

        match answer {
            Ok(true) => {
                if let Err(e) = self.app.delete_items(std::slice::from_ref(&loc)) {
                    resume(&mut self.dialogs);
                    return Err(e);
                }
                self.host.router.go(ITEMS_PATH);
                self.dialogs.close(ITEM_DIALOG);
                self.item_id = None;
                self.staged = StagedEdit::default();
                self.mode = Mode::Viewing;
                self.focus = None;
                Ok(true)
            }
            Ok(false) => {
                resume(&mut self.dialogs);
                Ok(false)
            }
            Err(e) => {
                resume(&mut self.dialogs);
                Err(e)
            }
        }
    }
}

impl<A: AppState> Drop for ItemEditor<'_, A> {
    fn drop(&mut self) {
        self.app.unsubscribe(self.subscription);
    }
}
