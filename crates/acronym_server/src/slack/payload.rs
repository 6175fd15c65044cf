//! Decoding of Slack HTTP deliveries into bot events.
//!
//! # Responsibility
//! - Slash commands: form-encoded bodies.
//! - Interactions: form-encoded `payload=` JSON (`block_actions`,
//!   `view_submission`).
//! - Events API: JSON envelopes (`url_verification`, `app_mention`).
//!
//! # Invariants
//! - Unknown payload kinds, action ids and dialog ids are ignored, not errors.
//! - Dialog input blocks and their actions are keyed by `FieldKey::as_str`.

use acronym_core::{
    ActionKind, ButtonAction, DialogKind, DialogSubmission, InboundEvent, MentionEvent,
    SlashCommand,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum PayloadError {
    Form(serde_urlencoded::de::Error),
    Json(serde_json::Error),
    MissingField(&'static str),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(err) => write!(f, "invalid form body: {err}"),
            Self::Json(err) => write!(f, "invalid json payload: {err}"),
            Self::MissingField(field) => write!(f, "payload is missing `{field}`"),
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::MissingField(_) => None,
        }
    }
}

impl From<serde_urlencoded::de::Error> for PayloadError {
    fn from(value: serde_urlencoded::de::Error) -> Self {
        Self::Form(value)
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Result of decoding one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Event(InboundEvent),
    /// Events API endpoint verification; echo the challenge.
    Challenge(String),
    Ignored(String),
}

#[derive(Debug, Deserialize)]
struct SlashCommandForm {
    #[serde(default)]
    text: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    trigger_id: String,
}

#[derive(Debug, Deserialize)]
struct InteractionForm {
    payload: String,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChannelRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ActionPayload {
    action_id: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct InputValue {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ViewState {
    #[serde(default)]
    values: HashMap<String, HashMap<String, InputValue>>,
}

#[derive(Debug, Deserialize)]
struct ViewPayload {
    callback_id: String,
    #[serde(default)]
    private_metadata: String,
    #[serde(default)]
    state: ViewState,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InteractionPayload {
    BlockActions {
        user: UserRef,
        #[serde(default)]
        trigger_id: String,
        #[serde(default)]
        channel: Option<ChannelRef>,
        #[serde(default)]
        response_url: Option<String>,
        #[serde(default)]
        actions: Vec<ActionPayload>,
    },
    ViewSubmission {
        user: UserRef,
        view: ViewPayload,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    channel: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventEnvelope {
    UrlVerification { challenge: String },
    EventCallback { event: EventPayload },
    #[serde(other)]
    Other,
}

/// Decodes a slash command delivery.
pub fn decode_slash_command(body: &str) -> Result<Decoded, PayloadError> {
    let form: SlashCommandForm = serde_urlencoded::from_str(body)?;
    Ok(Decoded::Event(InboundEvent::Command(SlashCommand {
        text: form.text,
        user_id: form.user_id,
        channel_id: form.channel_id,
        trigger_id: form.trigger_id,
    })))
}

/// Decodes an interactivity delivery.
pub fn decode_interaction(body: &str) -> Result<Decoded, PayloadError> {
    let form: InteractionForm = serde_urlencoded::from_str(body)?;
    let payload: InteractionPayload = serde_json::from_str(&form.payload)?;

    match payload {
        InteractionPayload::BlockActions {
            user,
            trigger_id,
            channel,
            response_url,
            actions,
        } => {
            let action = actions
                .into_iter()
                .next()
                .ok_or(PayloadError::MissingField("actions"))?;
            let Some(kind) = ActionKind::parse(&action.action_id) else {
                return Ok(Decoded::Ignored(format!("action `{}`", action.action_id)));
            };
            Ok(Decoded::Event(InboundEvent::Action(ButtonAction {
                action: kind,
                value: action.value,
                user_id: user.id,
                channel_id: channel.map(|channel| channel.id),
                trigger_id,
                response_url,
            })))
        }
        InteractionPayload::ViewSubmission { user, view } => {
            let Some(kind) = DialogKind::parse(&view.callback_id) else {
                return Ok(Decoded::Ignored(format!("view `{}`", view.callback_id)));
            };
            Ok(Decoded::Event(InboundEvent::Submission(DialogSubmission {
                kind,
                user_id: user.id,
                values: flatten_view_state(view.state),
                context: view.private_metadata,
            })))
        }
        InteractionPayload::Other => Ok(Decoded::Ignored("interaction type".to_string())),
    }
}

/// Decodes an Events API delivery.
pub fn decode_event(body: &str) -> Result<Decoded, PayloadError> {
    match serde_json::from_str::<EventEnvelope>(body)? {
        EventEnvelope::UrlVerification { challenge } => Ok(Decoded::Challenge(challenge)),
        EventEnvelope::EventCallback { event } if event.kind == "app_mention" => {
            Ok(Decoded::Event(InboundEvent::Mention(MentionEvent {
                text: event.text,
                channel_id: event.channel,
            })))
        }
        EventEnvelope::EventCallback { event } => {
            Ok(Decoded::Ignored(format!("event `{}`", event.kind)))
        }
        EventEnvelope::Other => Ok(Decoded::Ignored("envelope type".to_string())),
    }
}

fn flatten_view_state(state: ViewState) -> BTreeMap<String, String> {
    state
        .values
        .into_iter()
        .filter_map(|(block_id, mut inputs)| {
            // Each input block holds exactly one element keyed like the block.
            let input = inputs
                .remove(&block_id)
                .or_else(|| inputs.into_values().next())?;
            Some((block_id, input.value.unwrap_or_default()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_event, decode_interaction, decode_slash_command, Decoded};
    use acronym_core::{ActionKind, DialogKind, FieldKey, InboundEvent};
    use serde_json::json;

    fn interaction_body(payload: serde_json::Value) -> String {
        serde_urlencoded::to_string([("payload", payload.to_string())]).unwrap()
    }

    #[test]
    fn slash_command_form_is_decoded() {
        let body = "command=%2Fwtf&text=delete+ato&user_id=U1&channel_id=C1&trigger_id=T1";
        let Decoded::Event(InboundEvent::Command(command)) = decode_slash_command(body).unwrap()
        else {
            panic!("expected command");
        };
        assert_eq!(command.text, "delete ato");
        assert_eq!(command.user_id, "U1");
        assert_eq!(command.channel_id, "C1");
        assert_eq!(command.trigger_id, "T1");
    }

    #[test]
    fn block_action_is_decoded() {
        let body = interaction_body(json!({
            "type": "block_actions",
            "user": {"id": "U1"},
            "trigger_id": "T2",
            "channel": {"id": "C1"},
            "response_url": "https://hooks.slack.com/actions/1",
            "actions": [{"action_id": "delete_acronym_select", "value": "4|ato"}]
        }));

        let Decoded::Event(InboundEvent::Action(action)) = decode_interaction(&body).unwrap()
        else {
            panic!("expected action");
        };
        assert_eq!(action.action, ActionKind::DeleteSelect);
        assert_eq!(action.value, "4|ato");
        assert_eq!(action.channel_id.as_deref(), Some("C1"));
        assert_eq!(
            action.response_url.as_deref(),
            Some("https://hooks.slack.com/actions/1")
        );
    }

    #[test]
    fn unknown_action_is_ignored() {
        let body = interaction_body(json!({
            "type": "block_actions",
            "user": {"id": "U1"},
            "actions": [{"action_id": "something_else"}]
        }));
        assert!(matches!(
            decode_interaction(&body).unwrap(),
            Decoded::Ignored(_)
        ));
    }

    #[test]
    fn view_submission_values_are_flattened_by_field_key() {
        let body = interaction_body(json!({
            "type": "view_submission",
            "user": {"id": "U1"},
            "view": {
                "callback_id": "add_acronym",
                "private_metadata": "{\"channel_id\":\"C1\"}",
                "state": {"values": {
                    "term": {"term": {"type": "plain_text_input", "value": "ato"}},
                    "exp": {"exp": {"type": "plain_text_input", "value": null}}
                }}
            }
        }));

        let Decoded::Event(InboundEvent::Submission(submission)) =
            decode_interaction(&body).unwrap()
        else {
            panic!("expected submission");
        };
        assert_eq!(submission.kind, DialogKind::AddAcronym);
        assert_eq!(submission.value(FieldKey::Term), "ato");
        assert_eq!(submission.value(FieldKey::Expansion), "");
        assert_eq!(submission.context, "{\"channel_id\":\"C1\"}");
    }

    #[test]
    fn view_closed_is_ignored() {
        let body = interaction_body(json!({"type": "view_closed", "user": {"id": "U1"}}));
        assert!(matches!(
            decode_interaction(&body).unwrap(),
            Decoded::Ignored(_)
        ));
    }

    #[test]
    fn events_api_challenge_and_mention() {
        let challenge = json!({"type": "url_verification", "challenge": "abc"}).to_string();
        assert_eq!(
            decode_event(&challenge).unwrap(),
            Decoded::Challenge("abc".to_string())
        );

        let mention = json!({
            "type": "event_callback",
            "event": {"type": "app_mention", "text": "<@UBOT> ato", "channel": "C1"}
        })
        .to_string();
        let Decoded::Event(InboundEvent::Mention(event)) = decode_event(&mention).unwrap() else {
            panic!("expected mention");
        };
        assert_eq!(event.text, "<@UBOT> ato");
        assert_eq!(event.channel_id, "C1");

        let other = json!({
            "type": "event_callback",
            "event": {"type": "reaction_added"}
        })
        .to_string();
        assert!(matches!(decode_event(&other).unwrap(), Decoded::Ignored(_)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_interaction("payload=%7Bnot-json").is_err());
        assert!(decode_event("not json").is_err());
    }
}
