//! Outbound side of the chat transport.

use crate::bot::ui::{Dialog, Reply};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug)]
pub enum TransportError {
    /// The request never produced a usable response.
    Request(String),
    /// The platform answered but refused the call.
    Rejected { method: String, reason: String },
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(details) => write!(f, "chat request failed: {details}"),
            Self::Rejected { method, reason } => write!(f, "{method} rejected: {reason}"),
        }
    }
}

impl Error for TransportError {}

/// Operations the bot needs from the chat platform.
pub trait ChatClient {
    fn open_dialog(&self, trigger_id: &str, dialog: &Dialog) -> TransportResult<()>;
    /// Replies through the handle attached to an interaction.
    fn respond(&self, response_url: &str, reply: &Reply) -> TransportResult<()>;
    fn post_ephemeral(&self, channel_id: &str, user_id: &str, text: &str) -> TransportResult<()>;
    fn post_message(&self, channel_id: &str, text: &str) -> TransportResult<()>;
}
