//! Core of the acronym bot: store, reply formatting and chat event handling.
//! Transport adapters depend on this crate, never the other way round.

pub mod bot;
pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod repo;

pub use bot::client::{ChatClient, TransportError, TransportResult};
pub use bot::event::{ButtonAction, DialogSubmission, InboundEvent, MentionEvent, SlashCommand};
pub use bot::token::{DialogContext, RecordToken, TokenError};
pub use bot::ui::{
    ActionKind, Button, ButtonStyle, Dialog, DialogField, DialogKind, FieldKey, Message, Reply,
    Section, Visibility,
};
pub use bot::{Bot, BotError, BotResult};
pub use format::format_lookup;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::acronym::{normalize_term, AcronymId, AcronymRecord};
pub use repo::acronym_repo::{
    AcronymRepository, RepoError, RepoResult, SharedAcronymStore, SqliteAcronymRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
