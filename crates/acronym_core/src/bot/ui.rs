//! Platform-neutral description of replies and dialogs.
//!
//! The transport adapter renders these values; the bot never builds
//! platform payloads itself.

/// Button actions the bot knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    DeleteSelect,
    DeleteConfirm,
    DeleteCancel,
    EditSelect,
    EditCancel,
}

impl ActionKind {
    /// Stable wire identifier round-tripped through the platform.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeleteSelect => "delete_acronym_select",
            Self::DeleteConfirm => "delete_acronym_confirm",
            Self::DeleteCancel => "delete_acronym_cancel",
            Self::EditSelect => "edit_acronym_select",
            Self::EditCancel => "edit_acronym_cancel",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "delete_acronym_select" => Some(Self::DeleteSelect),
            "delete_acronym_confirm" => Some(Self::DeleteConfirm),
            "delete_acronym_cancel" => Some(Self::DeleteCancel),
            "edit_acronym_select" => Some(Self::EditSelect),
            "edit_acronym_cancel" => Some(Self::EditCancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ActionKind,
    /// Opaque value handed back on click.
    pub value: String,
    pub style: ButtonStyle,
}

impl Button {
    pub fn new(
        label: impl Into<String>,
        action: ActionKind,
        value: impl Into<String>,
        style: ButtonStyle,
    ) -> Self {
        Self {
            label: label.into(),
            action,
            value: value.into(),
            style,
        }
    }
}

/// Markdown text with an optional button beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub text: String,
    pub accessory: Option<Button>,
}

/// Reply body: stacked sections followed by a row of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub sections: Vec<Section>,
    pub actions: Vec<Button>,
}

impl Message {
    /// Single-section message without buttons.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            sections: vec![Section {
                text: text.into(),
                accessory: None,
            }],
            actions: Vec::new(),
        }
    }

    pub fn push_section(&mut self, text: impl Into<String>, accessory: Option<Button>) {
        self.sections.push(Section {
            text: text.into(),
            accessory,
        });
    }

    /// Section texts joined by newlines, for notification fallbacks.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only the requesting user sees the reply.
    Ephemeral,
    /// Everyone in the conversation sees the reply.
    InChannel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: Message,
    pub visibility: Visibility,
    /// Replace the message the interaction originated from.
    pub replace_original: bool,
}

impl Reply {
    pub fn ephemeral(message: Message) -> Self {
        Self {
            message,
            visibility: Visibility::Ephemeral,
            replace_original: false,
        }
    }

    pub fn in_channel(message: Message) -> Self {
        Self {
            message,
            visibility: Visibility::InChannel,
            replace_original: false,
        }
    }

    /// Ephemeral reply that overwrites the originating message.
    pub fn replacing(message: Message) -> Self {
        Self {
            message,
            visibility: Visibility::Ephemeral,
            replace_original: true,
        }
    }
}

/// Dialogs the bot opens; the identifier comes back on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    AddAcronym,
    EditAcronym,
}

impl DialogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddAcronym => "add_acronym",
            Self::EditAcronym => "edit_acronym_modal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "add_acronym" => Some(Self::AddAcronym),
            "edit_acronym_modal" => Some(Self::EditAcronym),
            _ => None,
        }
    }
}

/// Stable keys of dialog input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Term,
    Expansion,
    EditedExpansion,
}

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::Expansion => "exp",
            Self::EditedExpansion => "exp_edit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogField {
    pub key: FieldKey,
    pub label: String,
    pub multiline: bool,
    pub initial_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub submit_label: String,
    pub close_label: String,
    /// Markdown shown above the fields.
    pub header: Option<String>,
    pub fields: Vec<DialogField>,
    /// Opaque context returned verbatim with the submission.
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::{ActionKind, DialogKind, Message};

    #[test]
    fn action_ids_round_trip() {
        for kind in [
            ActionKind::DeleteSelect,
            ActionKind::DeleteConfirm,
            ActionKind::DeleteCancel,
            ActionKind::EditSelect,
            ActionKind::EditCancel,
        ] {
            assert_eq!(ActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::parse("unknown"), None);
    }

    #[test]
    fn dialog_ids_round_trip() {
        assert_eq!(
            DialogKind::parse(DialogKind::EditAcronym.as_str()),
            Some(DialogKind::EditAcronym)
        );
        assert_eq!(DialogKind::parse("other_modal"), None);
    }

    #[test]
    fn plain_text_joins_sections() {
        let mut message = Message::text("header");
        message.push_section("1. first", None);
        assert_eq!(message.plain_text(), "header\n1. first");
    }
}
