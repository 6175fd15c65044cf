//! Slack Web API client backing the bot's `ChatClient`.

use super::blocks::{dialog_view, reply_body};
use acronym_core::{ChatClient, Dialog, Reply, TransportError, TransportResult};
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackWebClient {
    http: Client,
    bot_token: String,
    api_base: String,
}

impl SlackWebClient {
    pub fn new(bot_token: impl Into<String>, api_base: impl Into<String>) -> TransportResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            http,
            bot_token: bot_token.into(),
            api_base: api_base.into(),
        })
    }

    fn call(&self, method: &str, body: &Value) -> TransportResult<()> {
        let url = format!("{}/{method}", self.api_base);
        debug!("event=slack_call module=slack status=start method={}", method);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(body)
            .send()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        let parsed: ApiResponse = response
            .json()
            .map_err(|err| TransportError::Request(err.to_string()))?;

        if !parsed.ok {
            return Err(TransportError::Rejected {
                method: method.to_string(),
                reason: parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        Ok(())
    }
}

impl ChatClient for SlackWebClient {
    fn open_dialog(&self, trigger_id: &str, dialog: &Dialog) -> TransportResult<()> {
        self.call(
            "views.open",
            &json!({"trigger_id": trigger_id, "view": dialog_view(dialog)}),
        )
    }

    fn respond(&self, response_url: &str, reply: &Reply) -> TransportResult<()> {
        let response = self
            .http
            .post(response_url)
            .json(&reply_body(reply))
            .send()
            .map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                method: "response_url".to_string(),
                reason: status.to_string(),
            });
        }
        Ok(())
    }

    fn post_ephemeral(&self, channel_id: &str, user_id: &str, text: &str) -> TransportResult<()> {
        self.call(
            "chat.postEphemeral",
            &json!({"channel": channel_id, "user": user_id, "text": text}),
        )
    }

    fn post_message(&self, channel_id: &str, text: &str) -> TransportResult<()> {
        self.call(
            "chat.postMessage",
            &json!({"channel": channel_id, "text": text}),
        )
    }
}
