//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::password::{StrengthLevel, StrengthReport};
use crate::vault::{EntryMetadata, PlainEntry};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

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

/// Print a table of entry metadata (ID, Title, Modified).
pub fn print_entries_table(entries: &[EntryMetadata]) {
    if entries.is_empty() {
        info("No matching entries.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Modified"]);

    for e in entries {
        table.add_row(vec![
            e.id.clone(),
            e.title.clone(),
            e.modified_at.format(TIME_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print a decrypted entry.  The password is masked unless `reveal`.
pub fn print_entry(meta: &EntryMetadata, plain: &PlainEntry, reveal: bool) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let password = if reveal {
        plain.password.clone()
    } else {
        "********".to_string()
    };

    table.add_row(vec!["Title".to_string(), meta.title.clone()]);
    table.add_row(vec!["ID".to_string(), meta.id.clone()]);
    table.add_row(vec!["Username".to_string(), plain.username.clone()]);
    table.add_row(vec!["Password".to_string(), password]);
    if !plain.url.is_empty() {
        table.add_row(vec!["URL".to_string(), plain.url.clone()]);
    }
    if !plain.notes.is_empty() {
        table.add_row(vec!["Notes".to_string(), plain.notes.clone()]);
    }
    table.add_row(vec![
        "Created".to_string(),
        plain.created_at.format(TIME_FORMAT).to_string(),
    ]);
    table.add_row(vec![
        "Modified".to_string(),
        plain.modified_at.format(TIME_FORMAT).to_string(),
    ]);

    println!("{table}");
}

/// Print a strength score with a colored verdict and the suggestions.
pub fn print_strength(report: &StrengthReport) {
    let label = match report.level {
        StrengthLevel::Strong => style(report.level.to_string()).green().bold(),
        StrengthLevel::Good => style(report.level.to_string()).cyan().bold(),
        StrengthLevel::Moderate => style(report.level.to_string()).yellow().bold(),
        StrengthLevel::Weak => style(report.level.to_string()).red().bold(),
    };
    println!("Strength: {}/100 ({label})", report.score);

    for line in &report.feedback {
        tip(line);
    }
}
