//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::editor::{format_from_now, ItemView};
use crate::model::{Item, Vault};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of items (Id, Name, Vault, Fields, Tags, Updated).
pub fn print_items_table(items: &[(&Item, &Vault)]) {
    if items.is_empty() {
        info("No items yet.");
        return;
    }

    let now = chrono::Utc::now();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Vault", "Fields", "Tags", "Updated"]);

    for (item, vault) in items {
        table.add_row(vec![
            short_id(&item.id).to_string(),
            item.name.clone(),
            vault.name.clone(),
            item.fields.len().to_string(),
            item.tags.join(", "),
            format_from_now(item.updated, now),
        ]);
    }

    println!("{table}");
}

/// First eight characters of an id, enough to pass back as a prefix.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

const MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print the rendered item dialog.
///
/// Masked field values are replaced by dots unless `reveal` is set.
pub fn print_item_view(view: &ItemView, reveal: bool) {
    let mut title = style(&view.name).bold().to_string();
    if view.editing {
        title.push_str(&format!(" {}", style("[editing]").yellow()));
    }
    if view.readonly {
        title.push_str(&format!(" {}", style("[read-only]").dim()));
    }
    println!("{title}");
    println!(
        "{} {}",
        style(&view.vault_name).cyan(),
        style(short_id(&view.item_id)).dim()
    );

    if !view.tags.is_empty() {
        let tags: Vec<String> = view
            .tags
            .iter()
            .map(|t| style(format!("#{t}")).magenta().to_string())
            .collect();
        println!("{}", tags.join(" "));
    }

    let mut fields = Table::new();
    fields.set_content_arrangement(ContentArrangement::Dynamic);
    fields.set_header(vec!["#", "Name", "Value", "Type"]);
    for (i, field) in view.fields.iter().enumerate() {
        let value = if field.masked && !reveal {
            MASK.to_string()
        } else {
            field.value.clone()
        };
        fields.add_row(vec![
            i.to_string(),
            field.name.clone(),
            value,
            field.field_type.to_string(),
        ]);
    }
    if view.fields.is_empty() {
        println!("{}", style("This item has no fields.").dim());
    } else {
        println!("{fields}");
    }

    if !view.attachments.is_empty() {
        let mut attachments = Table::new();
        attachments.set_content_arrangement(ContentArrangement::Dynamic);
        attachments.set_header(vec!["Attachment", "Size", "Type"]);
        for att in &view.attachments {
            attachments.add_row(vec![
                att.name.clone(),
                att.size.clone(),
                att.content_type.clone(),
            ]);
        }
        println!("{attachments}");
    }

    let mut updated = format!("Updated {}", view.updated);
    if let Some(by) = &view.updated_by {
        updated.push_str(&format!(" by {by}"));
    }
    println!("{}", style(updated).dim());
}
