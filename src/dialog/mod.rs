//! Dialog module — nested dialogs and the modal stack.
//!
//! The item editor hands off to other dialogs (confirmation, password
//! generator, move-items) and waits for their result.  While a child
//! dialog runs, its parent stays alive but hidden; `DialogStack` keeps
//! track of which dialog is on top and restores the parent afterwards.

pub mod terminal;

use crate::app::AppState;
use crate::errors::Result;
use crate::model::{Item, ItemLocator};

pub use terminal::{TerminalAlert, TerminalConfirm, TerminalGenerator, TerminalMoveDialog};

/// Name of the item dialog frame.
pub const ITEM_DIALOG: &str = "item-dialog";
pub const CONFIRM_DIALOG: &str = "confirm";
pub const GENERATOR_DIALOG: &str = "generator";
pub const MOVE_ITEMS_DIALOG: &str = "move-items";

/// Visual weight of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmStyle {
    #[default]
    Plain,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStyle {
    Info,
    Warning,
}

/// A yes/no question with labelled answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub title: Option<String>,
    pub style: ConfirmStyle,
}

impl ConfirmRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            confirm_label: "OK".to_string(),
            cancel_label: "Cancel".to_string(),
            title: None,
            style: ConfirmStyle::Plain,
        }
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn style(mut self, style: ConfirmStyle) -> Self {
        self.style = style;
        self
    }
}

pub trait ConfirmPrompt {
    /// Ask the question; `true` means the user chose the confirm label.
    fn confirm(&mut self, request: &ConfirmRequest) -> Result<bool>;
}

/// Non-fatal notices shown to the user.
pub trait Alert {
    fn alert(&mut self, message: &str, style: AlertStyle) -> Result<()>;
}

pub trait GeneratorDialog {
    /// Produce a generated value, or `None` if the user dismissed the dialog.
    fn show(&mut self) -> Result<Option<String>>;
}

pub trait MoveItemsDialog {
    /// Let the user move `items` to another vault.
    ///
    /// Returns the relocated items (which may carry new ids), or `None`
    /// if nothing was moved.
    fn show(&mut self, app: &mut dyn AppState, items: &[ItemLocator])
        -> Result<Option<Vec<Item>>>;
}

/// Answers every confirmation with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&mut self, _request: &ConfirmRequest) -> Result<bool> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    name: &'static str,
    visible: bool,
}

/// Stack of open dialogs, innermost last.
#[derive(Debug, Default)]
pub struct DialogStack {
    frames: Vec<Frame>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a dialog, or make it visible again if it is already open.
    pub fn open(&mut self, name: &'static str) {
        match self.frames.iter_mut().find(|f| f.name == name) {
            Some(frame) => frame.visible = true,
            None => self.frames.push(Frame {
                name,
                visible: true,
            }),
        }
    }

    pub fn close(&mut self, name: &'static str) {
        self.frames.retain(|f| f.name != name);
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f.name == name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f.name == name && f.visible)
    }

    pub fn top(&self) -> Option<&'static str> {
        self.frames.last().map(|f| f.name)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Hide the top dialog without closing it. Returns its name.
    pub fn suspend(&mut self) -> Option<&'static str> {
        let frame = self.frames.last_mut()?;
        frame.visible = false;
        Some(frame.name)
    }

    /// Show a suspended dialog again.
    pub fn resume(&mut self, name: &'static str) {
        if let Some(frame) = self.frames.iter_mut().find(|f| f.name == name) {
            frame.visible = true;
        }
    }

    /// Run a child dialog on top of the current one.
    ///
    /// The parent is hidden while `f` runs and shown again afterwards,
    /// whether or not `f` succeeded.
    pub fn run_child<T>(
        &mut self,
        child: &'static str,
        f: impl FnOnce(&DialogStack) -> Result<T>,
    ) -> Result<T> {
        let parent = self.suspend();
        self.frames.push(Frame {
            name: child,
            visible: true,
        });

        let result = f(self);

        self.close(child);
        if let Some(parent) = parent {
            self.resume(parent);
        }
        result
    }
}
