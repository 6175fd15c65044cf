//! Inbound events delivered by the chat transport.

use crate::bot::ui::{ActionKind, DialogKind, FieldKey};
use std::collections::BTreeMap;

/// Invocation of the slash command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlashCommand {
    pub text: String,
    pub user_id: String,
    pub channel_id: String,
    /// Short-lived handle required to open a dialog.
    pub trigger_id: String,
}

/// Click on one of the bot's buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonAction {
    pub action: ActionKind,
    pub value: String,
    pub user_id: String,
    pub channel_id: Option<String>,
    pub trigger_id: String,
    /// Handle for replying to (or replacing) the clicked message.
    pub response_url: Option<String>,
}

/// Submitted dialog with its field values and round-tripped context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSubmission {
    pub kind: DialogKind,
    pub user_id: String,
    /// Entered text keyed by [`FieldKey::as_str`].
    pub values: BTreeMap<String, String>,
    pub context: String,
}

impl DialogSubmission {
    /// Entered text for `key`; missing fields read as empty.
    pub fn value(&self, key: FieldKey) -> &str {
        self.values
            .get(key.as_str())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Message that mentions the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionEvent {
    pub text: String,
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Command(SlashCommand),
    Action(ButtonAction),
    Submission(DialogSubmission),
    Mention(MentionEvent),
}

impl InboundEvent {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Action(_) => "action",
            Self::Submission(_) => "submission",
            Self::Mention(_) => "mention",
        }
    }
}
