//! Block Kit rendering of bot replies and dialogs.

use acronym_core::{Button, ButtonStyle, Dialog, DialogField, Message, Reply, Visibility};
use serde_json::{json, Map, Value};

/// Body for a slash command acknowledgment or a `response_url` post.
pub fn reply_body(reply: &Reply) -> Value {
    let response_type = match reply.visibility {
        Visibility::Ephemeral => "ephemeral",
        Visibility::InChannel => "in_channel",
    };
    json!({
        "response_type": response_type,
        "replace_original": reply.replace_original,
        "text": reply.message.plain_text(),
        "blocks": message_blocks(&reply.message),
    })
}

pub fn message_blocks(message: &Message) -> Vec<Value> {
    let mut blocks: Vec<Value> = message
        .sections
        .iter()
        .map(|section| {
            let mut block = json!({
                "type": "section",
                "text": {"type": "mrkdwn", "text": section.text},
            });
            if let Some(button) = &section.accessory {
                block["accessory"] = button_element(button);
            }
            block
        })
        .collect();

    if !message.actions.is_empty() {
        blocks.push(json!({
            "type": "actions",
            "elements": message.actions.iter().map(button_element).collect::<Vec<_>>(),
        }));
    }
    blocks
}

/// Modal view for `views.open`.
pub fn dialog_view(dialog: &Dialog) -> Value {
    let mut blocks = Vec::with_capacity(dialog.fields.len() + 1);
    if let Some(header) = &dialog.header {
        blocks.push(json!({
            "type": "section",
            "text": {"type": "mrkdwn", "text": header},
        }));
    }
    blocks.extend(dialog.fields.iter().map(input_block));

    json!({
        "type": "modal",
        "callback_id": dialog.kind.as_str(),
        "title": plain_text(&dialog.title),
        "submit": plain_text(&dialog.submit_label),
        "close": plain_text(&dialog.close_label),
        "private_metadata": dialog.context,
        "blocks": blocks,
    })
}

fn input_block(field: &DialogField) -> Value {
    let mut element = Map::new();
    element.insert("type".to_string(), json!("plain_text_input"));
    element.insert("action_id".to_string(), json!(field.key.as_str()));
    element.insert("multiline".to_string(), json!(field.multiline));
    if let Some(initial) = &field.initial_value {
        element.insert("initial_value".to_string(), json!(initial));
    }

    json!({
        "type": "input",
        "block_id": field.key.as_str(),
        "label": plain_text(&field.label),
        "element": Value::Object(element),
    })
}

fn button_element(button: &Button) -> Value {
    let style = match button.style {
        ButtonStyle::Primary => "primary",
        ButtonStyle::Danger => "danger",
    };
    json!({
        "type": "button",
        "text": plain_text(&button.label),
        "style": style,
        "action_id": button.action.as_str(),
        "value": button.value,
    })
}

fn plain_text(text: &str) -> Value {
    json!({"type": "plain_text", "text": text})
}
