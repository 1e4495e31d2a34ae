//! Item editor behaviour against an in-memory store and scripted dialogs.

mod common;

use common::{app, bank_item, host, Script, BANK_ID, SHARED_ID};
use itemvault::app::AppState;
use itemvault::dialog::{ConfirmStyle, ITEM_DIALOG};
use itemvault::editor::{EditorSettings, Focus, ItemEditor, Mode};
use itemvault::errors::ItemVaultError;
use itemvault::model::{AttachmentInfo, Field, FieldType, ItemUpdate};
use itemvault::router::ITEMS_PATH;

#[test]
fn show_stages_a_copy_of_the_item() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    assert_eq!(editor.mode(), Mode::Viewing);
    assert!(editor.is_visible());
    assert_eq!(editor.staged().fields(), bank_item().fields.as_slice());

    editor.edit();
    let staged = editor.staged_mut().unwrap();
    staged.set_field_value(0, "alice").unwrap();
    staged.set_name("Bank 2");

    let (item, _) = editor.app().get_item(BANK_ID).unwrap();
    assert_eq!(item.fields[0].value, "bob");
    assert_eq!(item.name, "Bank");
}

#[test]
fn show_unknown_item_leaves_state_alone() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());
    editor.show(BANK_ID).unwrap();

    let err = editor.show("missing").unwrap_err();
    assert!(matches!(err, ItemVaultError::ItemNotFound(_)));
    assert_eq!(editor.item_id(), Some(BANK_ID));
}

#[test]
fn show_again_switches_item_and_resets_mode() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    editor.show(SHARED_ID).unwrap();

    assert_eq!(editor.mode(), Mode::Viewing);
    assert_eq!(editor.staged().name(), "Shared");
    assert_eq!(editor.dialogs().depth(), 1);
}

#[test]
fn add_field_then_save_submits_one_update() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    assert_eq!(editor.focus(), Some(Focus::Name));

    editor.add_field(Field::new("pin", "1234", FieldType::Note));
    assert_eq!(editor.focus(), Some(Focus::Field(1)));
    editor.save().unwrap();

    assert_eq!(editor.mode(), Mode::Viewing);
    drop(editor);

    assert_eq!(
        app.updates,
        vec![(
            "v-private".to_string(),
            BANK_ID.to_string(),
            ItemUpdate {
                name: "Bank".into(),
                fields: vec![
                    Field::new("user", "bob", FieldType::Username),
                    Field::new("pin", "1234", FieldType::Note),
                ],
                tags: vec!["finance".into()],
            }
        )]
    );
    let (item, _) = app.get_item(BANK_ID).unwrap();
    assert_eq!(item.fields.len(), 2);
}

#[test]
fn cancel_after_remove_restores_fields_without_store_call() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    editor.remove_field(0);
    assert!(editor.staged().fields().is_empty());

    editor.cancel_edit();
    assert_eq!(editor.mode(), Mode::Viewing);
    assert_eq!(editor.staged().fields(), bank_item().fields.as_slice());
    drop(editor);

    assert!(app.updates.is_empty());
}

#[test]
fn cancel_after_mixed_edits_matches_item() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    editor.add_default_field();
    editor.add_field(Field::new("url", "https://bank.test", FieldType::Url));
    editor.remove_field(0);
    editor.staged_mut().unwrap().add_tag("work");
    editor.cancel_edit();

    let (item, _) = editor.app().get_item(BANK_ID).unwrap();
    assert!(editor.staged().matches(item));
}

#[test]
fn generate_value_fills_field_and_restores_dialog() {
    let mut app = app();
    let (host, recorded) = host(Script {
        generated: Some("Xy9!zQ"),
        ..Script::default()
    });
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    editor.add_field(Field::blank(FieldType::Password));

    assert!(editor.generate_value(1).unwrap());
    assert_eq!(editor.staged().fields()[1].value, "Xy9!zQ");
    assert_eq!(*recorded.generator_calls.borrow(), 1);
    assert!(editor.is_visible());
    assert_eq!(editor.dialogs().top(), Some(ITEM_DIALOG));
}

#[test]
fn dismissed_generator_changes_nothing() {
    let mut app = app();
    let (host, recorded) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    assert!(!editor.generate_value(0).unwrap());
    assert_eq!(editor.staged().fields()[0].value, "bob");
    assert_eq!(*recorded.generator_calls.borrow(), 1);
    assert!(editor.is_visible());
}

#[test]
fn readonly_vault_makes_edit_actions_noops() {
    let mut app = app();
    let (host, recorded) = host(Script {
        confirm: &[true],
        move_to: Some("v-private"),
        ..Script::default()
    });
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(SHARED_ID).unwrap();
    editor.edit();
    assert_eq!(editor.mode(), Mode::Viewing);
    editor.edit_field(0);
    assert_eq!(editor.mode(), Mode::Viewing);
    assert_eq!(editor.focus(), None);
    assert!(editor.staged_mut().is_none());

    assert_eq!(editor.move_item().unwrap(), None);
    assert!(!editor.delete_item().unwrap());

    assert!(recorded.moves.borrow().is_empty());
    assert!(recorded.asked.borrow().is_empty());
    assert!(editor.app().get_item(SHARED_ID).is_some());

    let view = editor.render().unwrap();
    assert!(view.readonly);
    assert!(!view.actions.can_edit);
}

#[test]
fn edit_field_enters_editing_with_focus() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit_field(0);
    assert_eq!(editor.mode(), Mode::Editing);
    assert_eq!(editor.focus(), Some(Focus::Field(0)));
}

#[test]
fn edit_field_out_of_range_is_ignored() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit_field(5);
    assert_eq!(editor.mode(), Mode::Viewing);
    assert_eq!(editor.focus(), None);
}

#[test]
fn delete_confirmed_removes_item_and_navigates() {
    let mut app = app();
    let (host, recorded) = host(Script {
        confirm: &[true],
        ..Script::default()
    });
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    assert!(editor.delete_item().unwrap());

    assert!(!editor.is_open());
    assert_eq!(editor.item_id(), None);
    assert_eq!(recorded.router.borrow().current(), Some(ITEMS_PATH));

    let asked = recorded.asked.borrow();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].confirm_label, "Delete");
    assert_eq!(asked[0].style, ConfirmStyle::Destructive);
    drop(asked);
    drop(editor);

    assert_eq!(app.deletes.len(), 1);
    assert!(app.get_item(BANK_ID).is_none());
}

#[test]
fn delete_declined_restores_dialog_unchanged() {
    let mut app = app();
    let (host, recorded) = host(Script {
        confirm: &[false],
        ..Script::default()
    });
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    editor.staged_mut().unwrap().set_name("Unsaved");

    assert!(!editor.delete_item().unwrap());
    assert!(editor.is_visible());
    assert_eq!(editor.mode(), Mode::Editing);
    assert_eq!(editor.staged().name(), "Unsaved");
    assert!(recorded.router.borrow().history().is_empty());
    drop(editor);

    assert!(app.deletes.is_empty());
    assert!(app.get_item(BANK_ID).is_some());
}

#[test]
fn move_navigates_to_new_identity() {
    let mut app = app();
    let (host, recorded) = host(Script {
        move_to: Some("v-other"),
        ..Script::default()
    });
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    let new_id = editor.move_item().unwrap().unwrap();

    assert_ne!(new_id, BANK_ID);
    assert!(editor.is_visible());
    assert_eq!(
        recorded.router.borrow().current_item(),
        Some(new_id.as_str())
    );
    assert_eq!(recorded.moves.borrow()[0][0].item, BANK_ID);

    let (_, vault) = editor.app().get_item(&new_id).unwrap();
    assert_eq!(vault.id, "v-other");

    editor.show(&new_id).unwrap();
    assert_eq!(editor.staged().name(), "Bank");
}

#[test]
fn cancelled_move_stays_put() {
    let mut app = app();
    let (host, recorded) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    assert_eq!(editor.move_item().unwrap(), None);
    assert_eq!(recorded.moves.borrow().len(), 1);
    assert!(recorded.router.borrow().history().is_empty());
    assert!(editor.is_visible());
}

#[test]
fn save_ends_viewing_even_when_store_fails() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    editor.staged_mut().unwrap().set_name("Bank 2");
    editor.app_mut().inner.lock();

    assert!(matches!(editor.save(), Err(ItemVaultError::Locked)));
    assert_eq!(editor.mode(), Mode::Viewing);
    assert_eq!(editor.staged().name(), "Bank 2");
}

#[test]
fn failed_save_leaves_attachment_names_alone() {
    let mut app = app();
    app.inner
        .item_attachments_mut(BANK_ID)
        .unwrap()
        .push(AttachmentInfo {
            id: "att-1".into(),
            vault: "v-private".into(),
            name: "scan.pdf".into(),
            size: 10,
            content_type: "application/pdf".into(),
        });
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    let staged = editor.staged_mut().unwrap();
    staged.set_name("Renamed");
    staged.rename_attachment("att-1", "statement.pdf");
    editor.app_mut().inner.lock();

    assert!(matches!(editor.save(), Err(ItemVaultError::Locked)));

    let (item, _) = editor.app().get_item(BANK_ID).unwrap();
    assert_eq!(item.name, "Bank");
    assert_eq!(item.attachments[0].name, "scan.pdf");
    // The rename stays staged for the next attempt.
    assert_eq!(editor.staged().attachment_name("att-1"), Some("statement.pdf"));
}

#[test]
fn save_applies_staged_attachment_names() {
    let mut app = app();
    app.inner
        .item_attachments_mut(BANK_ID)
        .unwrap()
        .extend([
            AttachmentInfo {
                id: "att-1".into(),
                vault: "v-private".into(),
                name: "scan.pdf".into(),
                size: 10,
                content_type: "application/pdf".into(),
            },
            AttachmentInfo {
                id: "att-2".into(),
                vault: "v-private".into(),
                name: "keep.txt".into(),
                size: 5,
                content_type: "text/plain".into(),
            },
        ]);
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.edit();
    let staged = editor.staged_mut().unwrap();
    staged.rename_attachment("att-1", "statement.pdf");
    staged.rename_attachment("att-2", "");

    let view = editor.render().unwrap();
    assert_eq!(view.attachments[0].name, "statement.pdf");

    editor.save().unwrap();
    let (item, _) = editor.app().get_item(BANK_ID).unwrap();
    assert_eq!(item.attachments[0].name, "statement.pdf");
    assert_eq!(item.attachments[1].name, "keep.txt");
}

#[test]
fn store_changes_mark_view_stale_but_keep_staged_edits() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    assert!(editor.needs_render());
    editor.render().unwrap();
    assert!(!editor.needs_render());

    editor.edit();
    editor.render().unwrap();
    editor.staged_mut().unwrap().set_name("Local");

    // A background sync rewrites the item underneath the edit.
    let mut synced = bank_item();
    synced.name = "Synced".into();
    editor.app_mut().inner.replace_item(synced).unwrap();
    assert!(editor.needs_render());

    let view = editor.render().unwrap();
    assert_eq!(view.name, "Local");

    // Last local save wins.
    editor.save().unwrap();
    let (item, _) = editor.app().get_item(BANK_ID).unwrap();
    assert_eq!(item.name, "Local");
}

#[test]
fn unrelated_changes_do_not_need_render() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.render().unwrap();

    let mut other = bank_item();
    other.id = "other".into();
    editor.app_mut().inner.insert_item("v-other", other).unwrap();
    assert!(!editor.needs_render());
}

#[test]
fn lock_hides_view_until_unlock() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.render().unwrap();

    editor.app_mut().inner.lock();
    assert!(editor.needs_render());
    assert!(editor.render().is_none());

    editor.app_mut().inner.unlock();
    assert!(editor.needs_render());
    assert!(editor.render().is_some());
}

#[test]
fn render_names_org_member_who_updated() {
    let mut app = app();
    let (host, _) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(SHARED_ID).unwrap();
    let view = editor.render().unwrap();
    assert_eq!(view.vault_name, "Team");
    assert_eq!(view.updated_by.as_deref(), Some("ann@acme.test"));
    assert!(view.fields[0].masked);
}

#[test]
fn copy_field_hands_value_to_clipboard() {
    let mut app = app();
    let (host, recorded) = host(Script::default());
    let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());

    editor.show(BANK_ID).unwrap();
    editor.copy_field(0).unwrap();
    assert_eq!(*recorded.copied.borrow(), vec!["bob".to_string()]);

    assert!(matches!(
        editor.copy_field(9),
        Err(ItemVaultError::FieldOutOfRange { index: 9, len: 1 })
    ));
}

#[test]
fn dropping_editor_unsubscribes() {
    let mut app = app();
    {
        let (host, _) = host(Script::default());
        let mut editor = ItemEditor::new(&mut app, host, EditorSettings::default());
        editor.show(BANK_ID).unwrap();
        assert_eq!(editor.app().inner.listener_count(), 1);
    }
    assert_eq!(app.inner.listener_count(), 0);
}
