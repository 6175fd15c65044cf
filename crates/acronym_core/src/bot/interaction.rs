//! Button and dialog flows for add, edit and delete.
//!
//! # Responsibility
//! - Drive `select -> confirm -> {deleted, cancelled}` for deletes.
//! - Open the edit dialog and apply its submission.
//! - Apply add dialog submissions.
//!
//! # Invariants
//! - The clicked token or dialog context is the only carried state.
//! - A record that disappeared between steps degrades to a placeholder or
//!   a no-op, never an error.

use crate::bot::event::{ButtonAction, DialogSubmission};
use crate::bot::token::{DialogContext, RecordToken, TokenError};
use crate::bot::ui::{
    ActionKind, Button, ButtonStyle, Dialog, DialogField, DialogKind, FieldKey, Message, Reply,
};
use crate::bot::BotResult;
use crate::format;
use crate::model::acronym::{normalize_expansion, normalize_term};
use crate::repo::acronym_repo::AcronymRepository;
use log::info;

/// What the transport should do with a handled button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Replace the clicked message.
    Replace(Reply),
    OpenDialog(Dialog),
}

/// Ephemeral confirmation sent after a dialog submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
}

/// Handles one button click.
///
/// # Errors
/// - `TokenError::MalformedRecord` when a select/confirm value is not `id|term`.
/// - Store failures unchanged.
pub fn handle_action<R>(repo: &R, action: &ButtonAction) -> BotResult<ActionOutcome>
where
    R: AcronymRepository + ?Sized,
{
    let outcome = match action.action {
        ActionKind::DeleteSelect => {
            let token: RecordToken = action.value.parse()?;
            let expansion = repo
                .fetch_expansion(token.id)?
                .unwrap_or_else(|| format::MISSING_DEFINITION.to_string());
            ActionOutcome::Replace(Reply::replacing(delete_confirmation(&token, &expansion)))
        }
        ActionKind::DeleteConfirm => {
            let token: RecordToken = action.value.parse()?;
            let removed = repo.delete(token.id)?;
            info!(
                "event=acronym_delete module=bot status=ok id={} removed={}",
                token.id, removed
            );
            ActionOutcome::Replace(Reply::replacing(Message::text(format::deleted(
                &token.term,
            ))))
        }
        ActionKind::DeleteCancel => {
            ActionOutcome::Replace(Reply::replacing(Message::text(format::delete_cancelled())))
        }
        ActionKind::EditSelect => {
            let token: RecordToken = action.value.parse()?;
            let current = repo.fetch_expansion(token.id)?.unwrap_or_default();
            let channel_id = action.channel_id.clone().unwrap_or_default();
            ActionOutcome::OpenDialog(edit_dialog(token, &current, channel_id)?)
        }
        ActionKind::EditCancel => {
            ActionOutcome::Replace(Reply::replacing(Message::text(format::edit_cancelled())))
        }
    };
    Ok(outcome)
}

/// Applies a submitted dialog and returns the notice to send.
///
/// Blank input is skipped by the store; the notice says so instead of
/// echoing a success message.
///
/// # Errors
/// - `TokenError` when the context cannot be decoded or an edit lacks its record.
/// - Store failures unchanged.
pub fn handle_submission<R>(repo: &R, submission: &DialogSubmission) -> BotResult<Notice>
where
    R: AcronymRepository + ?Sized,
{
    let context = DialogContext::decode(&submission.context)?;
    let channel_id = if context.channel_id.is_empty() {
        submission.user_id.clone()
    } else {
        context.channel_id.clone()
    };

    let text = match submission.kind {
        DialogKind::AddAcronym => {
            let term = submission.value(FieldKey::Term);
            let expansion = submission.value(FieldKey::Expansion);
            match repo.insert(term, expansion)? {
                Some(id) => {
                    info!("event=acronym_insert module=bot status=ok id={}", id);
                    format::saved(term, expansion)
                }
                None => {
                    info!("event=acronym_insert module=bot status=skipped reason=blank_input");
                    format::not_saved()
                }
            }
        }
        DialogKind::EditAcronym => {
            let token = context.record.ok_or(TokenError::MissingRecord)?;
            let expansion = submission.value(FieldKey::EditedExpansion);
            let changed = repo.update_expansion(token.id, expansion)?;
            info!(
                "event=acronym_update module=bot status=ok id={} changed={}",
                token.id, changed
            );
            if normalize_expansion(expansion).is_empty() {
                format::not_updated(&token.term)
            } else if changed {
                format::updated(&token.term, expansion)
            } else {
                format::edit_target_missing(&token.term)
            }
        }
    };

    Ok(Notice {
        channel_id,
        user_id: submission.user_id.clone(),
        text,
    })
}

/// Builds the edit dialog for one record.
pub fn edit_dialog(
    token: RecordToken,
    current_expansion: &str,
    channel_id: String,
) -> BotResult<Dialog> {
    let header = format!("*{}*", normalize_term(&token.term));
    let initial_value = Some(current_expansion.to_string()).filter(|value| !value.is_empty());

    Ok(Dialog {
        kind: DialogKind::EditAcronym,
        title: "Edit Definition".to_string(),
        submit_label: "Save".to_string(),
        close_label: "Cancel".to_string(),
        header: Some(header),
        fields: vec![DialogField {
            key: FieldKey::EditedExpansion,
            label: "Edit Expansion (meaning)".to_string(),
            multiline: true,
            initial_value,
        }],
        context: DialogContext::for_record(channel_id, token).encode()?,
    })
}

fn delete_confirmation(token: &RecordToken, expansion: &str) -> Message {
    let mut message = Message::text(format::delete_prompt(&token.term, expansion));
    message.actions.push(Button::new(
        "Yes, Delete",
        ActionKind::DeleteConfirm,
        token.to_string(),
        ButtonStyle::Danger,
    ));
    message.actions.push(Button::new(
        "Cancel",
        ActionKind::DeleteCancel,
        token.term.clone(),
        ButtonStyle::Primary,
    ));
    message
}
