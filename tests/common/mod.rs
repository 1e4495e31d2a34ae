//! Fixtures and scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use itemvault::app::{AppState, AttachmentFile, Listener, MemoryApp, SubscriptionId};
use itemvault::clipboard::Clipboard;
use itemvault::dialog::{
    Alert, AlertStyle, ConfirmPrompt, ConfirmRequest, GeneratorDialog, MoveItemsDialog,
};
use itemvault::editor::EditorHost;
use itemvault::errors::Result;
use itemvault::model::{
    Account, AttachmentInfo, Field, FieldType, Item, ItemLocator, ItemUpdate, Org, OrgMember,
    OrgRef, Vault, VaultMember,
};
use itemvault::router::SessionRouter;

pub type Shared<T> = Rc<RefCell<T>>;

pub const ACCOUNT_ID: &str = "acc-1";
pub const BANK_ID: &str = "a";
pub const SHARED_ID: &str = "s";

// ── Store ───────────────────────────────────────────────────────────

/// `MemoryApp` that also remembers every update and delete request.
pub struct RecordingApp {
    pub inner: MemoryApp,
    pub updates: Vec<(String, String, ItemUpdate)>,
    pub deletes: Vec<Vec<ItemLocator>>,
}

impl AppState for RecordingApp {
    fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    fn account(&self) -> &Account {
        self.inner.account()
    }

    fn get_item(&self, id: &str) -> Option<(&Item, &Vault)> {
        self.inner.get_item(id)
    }

    fn get_org(&self, id: &str) -> Option<&Org> {
        self.inner.get_org(id)
    }

    fn has_write_permissions(&self, vault: &Vault) -> bool {
        self.inner.has_write_permissions(vault)
    }

    fn vaults(&self) -> Vec<&Vault> {
        self.inner.vaults()
    }

    fn update_item(&mut self, vault_id: &str, item_id: &str, update: ItemUpdate) -> Result<()> {
        self.updates
            .push((vault_id.to_string(), item_id.to_string(), update.clone()));
        self.inner.update_item(vault_id, item_id, update)
    }

    fn delete_items(&mut self, items: &[ItemLocator]) -> Result<()> {
        self.deletes.push(items.to_vec());
        self.inner.delete_items(items)
    }

    fn move_items(&mut self, items: &[ItemLocator], target_vault: &str) -> Result<Vec<Item>> {
        self.inner.move_items(items, target_vault)
    }

    fn item_attachments_mut(&mut self, item_id: &str) -> Option<&mut Vec<AttachmentInfo>> {
        self.inner.item_attachments_mut(item_id)
    }

    fn create_attachment(&mut self, vault_id: &str, file: &AttachmentFile) -> Result<AttachmentInfo> {
        self.inner.create_attachment(vault_id, file)
    }

    fn upload_attachment(&mut self, info: &AttachmentInfo, file: &AttachmentFile) -> Result<()> {
        self.inner.upload_attachment(info, file)
    }

    fn delete_attachment(&mut self, vault_id: &str, info: &AttachmentInfo) -> Result<()> {
        self.inner.delete_attachment(vault_id, info)
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.inner.unsubscribe(id);
    }
}

pub fn account() -> Account {
    Account {
        id: ACCOUNT_ID.into(),
        email: "bob@example.test".into(),
        name: "Bob".into(),
    }
}

pub fn private_vault() -> Vault {
    Vault {
        id: "v-private".into(),
        name: "Private".into(),
        org: None,
        members: Vec::new(),
    }
}

pub fn other_vault() -> Vault {
    Vault {
        id: "v-other".into(),
        name: "Other".into(),
        org: None,
        members: Vec::new(),
    }
}

/// An org vault the account may read but not write.
pub fn team_vault() -> Vault {
    Vault {
        id: "v-team".into(),
        name: "Team".into(),
        org: Some(OrgRef {
            id: "o1".into(),
            name: "Acme".into(),
        }),
        members: vec![VaultMember {
            account: ACCOUNT_ID.into(),
            write: false,
        }],
    }
}

pub fn acme() -> Org {
    Org {
        id: "o1".into(),
        name: "Acme".into(),
        members: vec![
            OrgMember {
                id: ACCOUNT_ID.into(),
                email: "bob@example.test".into(),
                name: "Bob".into(),
            },
            OrgMember {
                id: "m2".into(),
                email: "ann@acme.test".into(),
                name: "Ann".into(),
            },
        ],
    }
}

pub fn bank_item() -> Item {
    let mut item = Item::new("Bank", ACCOUNT_ID);
    item.id = BANK_ID.into();
    item.fields = vec![Field::new("user", "bob", FieldType::Username)];
    item.tags = vec!["finance".into()];
    item
}

pub fn shared_item() -> Item {
    let mut item = Item::new("Shared", "m2");
    item.id = SHARED_ID.into();
    item.fields = vec![Field::new("password", "s3cret", FieldType::Password)];
    item
}

/// Private, other and read-only team vaults; "Bank" in private, "Shared" in team.
pub fn app() -> RecordingApp {
    let mut inner = MemoryApp::new(account());
    inner.add_vault(private_vault());
    inner.add_vault(other_vault());
    inner.add_vault(team_vault());
    inner.add_org(acme());
    inner.insert_item("v-private", bank_item()).unwrap();
    inner.insert_item("v-team", shared_item()).unwrap();
    RecordingApp {
        inner,
        updates: Vec::new(),
        deletes: Vec::new(),
    }
}

// ── Collaborators ───────────────────────────────────────────────────

pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    asked: Shared<Vec<ConfirmRequest>>,
}

impl ConfirmPrompt for ScriptedConfirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> Result<bool> {
        self.asked.borrow_mut().push(request.clone());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

pub struct RecordingAlert {
    log: Shared<Vec<(String, AlertStyle)>>,
}

impl Alert for RecordingAlert {
    fn alert(&mut self, message: &str, style: AlertStyle) -> Result<()> {
        self.log.borrow_mut().push((message.to_string(), style));
        Ok(())
    }
}

pub struct FixedGenerator {
    value: Option<String>,
    calls: Shared<usize>,
}

impl GeneratorDialog for FixedGenerator {
    fn show(&mut self) -> Result<Option<String>> {
        *self.calls.borrow_mut() += 1;
        Ok(self.value.clone())
    }
}

/// Moves everything into `target`, or cancels when there is none.
pub struct ScriptedMove {
    target: Option<String>,
    calls: Shared<Vec<Vec<ItemLocator>>>,
}

impl MoveItemsDialog for ScriptedMove {
    fn show(&mut self, app: &mut dyn AppState, items: &[ItemLocator]) -> Result<Option<Vec<Item>>> {
        self.calls.borrow_mut().push(items.to_vec());
        match &self.target {
            Some(target) => app.move_items(items, target).map(Some),
            None => Ok(None),
        }
    }
}

pub struct RecordingClipboard {
    copied: Shared<Vec<String>>,
}

impl Clipboard for RecordingClipboard {
    fn copy_field(&mut self, _item: &Item, field: &Field) -> Result<()> {
        self.copied.borrow_mut().push(field.value.clone());
        Ok(())
    }
}

/// What the scripted collaborators saw.
#[derive(Default)]
pub struct Recorded {
    pub asked: Shared<Vec<ConfirmRequest>>,
    pub alerts: Shared<Vec<(String, AlertStyle)>>,
    pub generator_calls: Shared<usize>,
    pub moves: Shared<Vec<Vec<ItemLocator>>>,
    pub copied: Shared<Vec<String>>,
    pub router: Shared<SessionRouter>,
}

/// How the scripted collaborators answer.
#[derive(Default)]
pub struct Script<'s> {
    pub confirm: &'s [bool],
    pub generated: Option<&'s str>,
    pub move_to: Option<&'s str>,
}

pub fn host(script: Script<'_>) -> (EditorHost, Recorded) {
    let recorded = Recorded::default();
    let host = EditorHost {
        confirm: Box::new(ScriptedConfirm {
            answers: script.confirm.iter().copied().collect(),
            asked: Rc::clone(&recorded.asked),
        }),
        alert: Box::new(RecordingAlert {
            log: Rc::clone(&recorded.alerts),
        }),
        generator: Box::new(FixedGenerator {
            value: script.generated.map(str::to_string),
            calls: Rc::clone(&recorded.generator_calls),
        }),
        mover: Box::new(ScriptedMove {
            target: script.move_to.map(str::to_string),
            calls: Rc::clone(&recorded.moves),
        }),
        router: Box::new(Rc::clone(&recorded.router)),
        clipboard: Box::new(RecordingClipboard {
            copied: Rc::clone(&recorded.copied),
        }),
    };
    (host, recorded)
}
