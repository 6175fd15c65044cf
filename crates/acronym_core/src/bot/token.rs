//! Round-trip context carried through buttons and dialogs.
//!
//! # Invariants
//! - `RecordToken` wire form is `id|term`; parsing splits on the first `|`
//!   only, so terms containing `|` survive the round trip.
//! - `DialogContext` travels as JSON; an empty string decodes to the default.

use crate::model::acronym::AcronymId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const TOKEN_DELIMITER: char = '|';

#[derive(Debug)]
pub enum TokenError {
    /// Button value is not `id|term`.
    MalformedRecord(String),
    /// Dialog context is not the JSON this bot produced.
    MalformedContext(String),
    /// Edit submission without the record it targets.
    MissingRecord,
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRecord(value) => write!(f, "malformed record token `{value}`"),
            Self::MalformedContext(details) => write!(f, "malformed dialog context: {details}"),
            Self::MissingRecord => write!(f, "dialog context does not reference a record"),
        }
    }
}

impl Error for TokenError {}

/// Reference to one record, as shown on the button that was clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordToken {
    pub id: AcronymId,
    /// Term as the user typed it; normalized only for display.
    pub term: String,
}

impl RecordToken {
    pub fn new(id: AcronymId, term: impl Into<String>) -> Self {
        Self {
            id,
            term: term.into(),
        }
    }
}

impl Display for RecordToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{TOKEN_DELIMITER}{}", self.id, self.term)
    }
}

impl FromStr for RecordToken {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (id, term) = value
            .split_once(TOKEN_DELIMITER)
            .ok_or_else(|| TokenError::MalformedRecord(value.to_string()))?;
        let id = id
            .trim()
            .parse::<AcronymId>()
            .map_err(|_| TokenError::MalformedRecord(value.to_string()))?;
        Ok(Self::new(id, term))
    }
}

/// Context attached to an opened dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogContext {
    /// Conversation the dialog was opened from; empty when unknown.
    #[serde(default)]
    pub channel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordToken>,
}

impl DialogContext {
    pub fn for_channel(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            record: None,
        }
    }

    pub fn for_record(channel_id: impl Into<String>, record: RecordToken) -> Self {
        Self {
            channel_id: channel_id.into(),
            record: Some(record),
        }
    }

    pub fn encode(&self) -> Result<String, TokenError> {
        serde_json::to_string(self).map_err(|err| TokenError::MalformedContext(err.to_string()))
    }

    pub fn decode(value: &str) -> Result<Self, TokenError> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(value).map_err(|err| TokenError::MalformedContext(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DialogContext, RecordToken, TokenError};

    #[test]
    fn record_token_uses_id_pipe_term() {
        assert_eq!(RecordToken::new(7, "ato").to_string(), "7|ato");
    }

    #[test]
    fn record_token_keeps_pipes_inside_term() {
        let token: RecordToken = "12|A|B".parse().unwrap();
        assert_eq!(token, RecordToken::new(12, "A|B"));
        assert_eq!(token.to_string(), "12|A|B");
    }

    #[test]
    fn record_token_rejects_missing_id() {
        let err = "ATO".parse::<RecordToken>().unwrap_err();
        assert!(matches!(err, TokenError::MalformedRecord(_)));
        let err = "x|ATO".parse::<RecordToken>().unwrap_err();
        assert!(matches!(err, TokenError::MalformedRecord(_)));
    }

    #[test]
    fn dialog_context_round_trips_through_json() {
        let context = DialogContext::for_record("C123", RecordToken::new(3, "a|b"));
        let decoded = DialogContext::decode(&context.encode().unwrap()).unwrap();
        assert_eq!(decoded, context);
    }

    #[test]
    fn empty_dialog_context_decodes_to_default() {
        assert_eq!(DialogContext::decode("").unwrap(), DialogContext::default());
        assert!(DialogContext::decode("C123").is_err());
    }
}
