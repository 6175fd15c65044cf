//! User-facing reply text.
//!
//! Every function here is pure; terms are normalized before they are shown.

use crate::model::acronym::normalize_term;

/// Slash command the bot is registered under.
pub const SLASH_COMMAND: &str = "/wtf";

/// Shown in place of an expansion when the record vanished between clicks.
pub const MISSING_DEFINITION: &str = "(definition not found)";

/// Renders the answer to a lookup.
pub fn format_lookup(term: &str, expansions: &[String]) -> String {
    let term = normalize_term(term);
    if expansions.is_empty() {
        return format!("Nothing for *{term}* yet. Try `{SLASH_COMMAND} add` to submit one.");
    }

    let mut lines = Vec::with_capacity(expansions.len() + 1);
    lines.push(format!("*{term}* has {} meaning(s):", expansions.len()));
    for (index, expansion) in expansions.iter().enumerate() {
        lines.push(format!("{}. {expansion}", index + 1));
    }
    lines.join("\n")
}

pub fn usage() -> String {
    format!("Usage: `{SLASH_COMMAND} ATO` or `{SLASH_COMMAND} add`")
}

pub fn subcommand_usage(subcommand: &str) -> String {
    format!("Usage: `{SLASH_COMMAND} {subcommand} [acronym]`")
}

pub fn no_definitions(term: &str) -> String {
    format!("No definitions found for *{}*.", normalize_term(term))
}

/// Header of the per-record picker; `verb` is `delete` or `edit`.
pub fn picker_header(term: &str, count: usize, verb: &str) -> String {
    format!(
        "*{}* has {count} meaning(s). Which one do you want to {verb}?",
        normalize_term(term)
    )
}

/// One numbered picker line, 1-based.
pub fn picker_line(position: usize, expansion: &str) -> String {
    format!("{position}. {expansion}")
}

pub fn delete_prompt(term: &str, expansion: &str) -> String {
    format!(
        "Are you sure you want to delete this definition for *{}*?\n> {expansion}",
        normalize_term(term)
    )
}

pub fn deleted(term: &str) -> String {
    format!("Deleted one definition for *{}*.", normalize_term(term))
}

pub fn delete_cancelled() -> String {
    "Delete cancelled.".to_string()
}

pub fn edit_cancelled() -> String {
    "Edit cancelled.".to_string()
}

pub fn saved(term: &str, expansion: &str) -> String {
    format!("Saved: *{}* → {}", normalize_term(term), expansion.trim())
}

pub fn not_saved() -> String {
    "Nothing saved: both the acronym and its expansion are required.".to_string()
}

pub fn updated(term: &str, expansion: &str) -> String {
    format!("Updated: *{}* → {}", normalize_term(term), expansion.trim())
}

pub fn not_updated(term: &str) -> String {
    format!(
        "Nothing changed for *{}*: the new expansion was empty.",
        normalize_term(term)
    )
}

pub fn edit_target_missing(term: &str) -> String {
    format!(
        "Nothing changed for *{}*: {MISSING_DEFINITION}",
        normalize_term(term)
    )
}

pub fn mention_help() -> String {
    "Give me an acronym, e.g., `ATO`".to_string()
}
