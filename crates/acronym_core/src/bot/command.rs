//! Slash command router.
//!
//! # Responsibility
//! - Split the command text into a subcommand and its argument.
//! - Answer lookups directly and build pickers/dialogs for add, edit, delete.
//!
//! # Invariants
//! - Subcommand keywords match the whole first token, case-insensitively.
//! - Failed lookups are answered ephemerally; hits go to the channel.
//! - Picker buttons carry a `RecordToken` for exactly one record.

use crate::bot::event::SlashCommand;
use crate::bot::token::{DialogContext, RecordToken};
use crate::bot::ui::{
    ActionKind, Button, ButtonStyle, Dialog, DialogField, DialogKind, FieldKey, Message, Reply,
};
use crate::bot::BotResult;
use crate::format;
use crate::model::acronym::{normalize_term, AcronymId};
use crate::repo::acronym_repo::AcronymRepository;

/// Parsed form of the command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand<'a> {
    Empty,
    Add { prefill: Option<&'a str> },
    Delete { term: Option<&'a str> },
    Edit { term: Option<&'a str> },
    Lookup { term: &'a str },
}

impl<'a> Subcommand<'a> {
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim();
        let mut tokens = text.split_whitespace();
        let Some(first) = tokens.next() else {
            return Self::Empty;
        };
        let argument = tokens.next();

        if first.eq_ignore_ascii_case("add") {
            Self::Add { prefill: argument }
        } else if first.eq_ignore_ascii_case("delete") {
            Self::Delete { term: argument }
        } else if first.eq_ignore_ascii_case("edit") {
            Self::Edit { term: argument }
        } else {
            Self::Lookup { term: text }
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Edit { .. } => "edit",
            Self::Lookup { .. } => "lookup",
        }
    }
}

/// What the transport should do with a routed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Reply(Reply),
    OpenDialog(Dialog),
}

/// Picker flavour shared by `delete` and `edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerKind {
    Delete,
    Edit,
}

impl PickerKind {
    fn verb(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Edit => "edit",
        }
    }

    fn select_button(self, token: &RecordToken) -> Button {
        match self {
            Self::Delete => Button::new(
                "Delete",
                ActionKind::DeleteSelect,
                token.to_string(),
                ButtonStyle::Danger,
            ),
            Self::Edit => Button::new(
                "Edit",
                ActionKind::EditSelect,
                token.to_string(),
                ButtonStyle::Primary,
            ),
        }
    }

    fn cancel_action(self) -> ActionKind {
        match self {
            Self::Delete => ActionKind::DeleteCancel,
            Self::Edit => ActionKind::EditCancel,
        }
    }
}

/// Routes one slash command invocation.
///
/// # Errors
/// - Returns store failures unchanged.
pub fn route_command<R>(repo: &R, command: &SlashCommand) -> BotResult<CommandOutcome>
where
    R: AcronymRepository + ?Sized,
{
    let outcome = match Subcommand::parse(&command.text) {
        Subcommand::Empty => CommandOutcome::Reply(Reply::ephemeral(Message::text(format::usage()))),
        Subcommand::Add { prefill } => {
            CommandOutcome::OpenDialog(add_dialog(prefill, &command.channel_id)?)
        }
        Subcommand::Delete { term } => picker_reply(repo, term, PickerKind::Delete)?,
        Subcommand::Edit { term } => picker_reply(repo, term, PickerKind::Edit)?,
        Subcommand::Lookup { term } => {
            let expansions = repo.lookup(term)?;
            let message = Message::text(format::format_lookup(term, &expansions));
            if expansions.is_empty() {
                CommandOutcome::Reply(Reply::ephemeral(message))
            } else {
                CommandOutcome::Reply(Reply::in_channel(message))
            }
        }
    };
    Ok(outcome)
}

/// Builds the add dialog, optionally pre-filling the term.
pub fn add_dialog(prefill: Option<&str>, channel_id: &str) -> BotResult<Dialog> {
    let initial_term = prefill
        .map(normalize_term)
        .filter(|term| !term.is_empty());

    Ok(Dialog {
        kind: DialogKind::AddAcronym,
        title: "Add Acronym".to_string(),
        submit_label: "Save".to_string(),
        close_label: "Cancel".to_string(),
        header: None,
        fields: vec![
            DialogField {
                key: FieldKey::Term,
                label: "Acronym (e.g., ATO)".to_string(),
                multiline: false,
                initial_value: initial_term,
            },
            DialogField {
                key: FieldKey::Expansion,
                label: "Expansion (meaning)".to_string(),
                multiline: true,
                initial_value: None,
            },
        ],
        context: DialogContext::for_channel(channel_id).encode()?,
    })
}

fn picker_reply<R>(repo: &R, term: Option<&str>, kind: PickerKind) -> BotResult<CommandOutcome>
where
    R: AcronymRepository + ?Sized,
{
    let Some(term) = term else {
        let usage = format::subcommand_usage(kind.verb());
        return Ok(CommandOutcome::Reply(Reply::ephemeral(Message::text(usage))));
    };

    let rows = repo.lookup_with_ids(term)?;
    if rows.is_empty() {
        let text = format::no_definitions(term);
        return Ok(CommandOutcome::Reply(Reply::ephemeral(Message::text(text))));
    }

    Ok(CommandOutcome::Reply(Reply::ephemeral(record_picker(
        term, &rows, kind,
    ))))
}

fn record_picker(term: &str, rows: &[(AcronymId, String)], kind: PickerKind) -> Message {
    let mut message = Message::text(format::picker_header(term, rows.len(), kind.verb()));
    for (index, (id, expansion)) in rows.iter().enumerate() {
        let token = RecordToken::new(*id, term);
        message.push_section(
            format::picker_line(index + 1, expansion),
            Some(kind.select_button(&token)),
        );
    }
    message.actions.push(Button::new(
        "Cancel",
        kind.cancel_action(),
        term,
        ButtonStyle::Primary,
    ));
    message
}
