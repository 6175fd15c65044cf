//! Chat event handling for the acronym bot.
//!
//! # Responsibility
//! - Route slash commands, button clicks, dialog submissions and mentions
//!   to the store and formatter.
//! - Perform the resulting side effects through a [`ChatClient`].
//!
//! # Invariants
//! - Every event is handled synchronously and independently.
//! - Transport failures are logged and swallowed; store writes already made
//!   are never rolled back.
//! - Store failures abort only the current event.

pub mod client;
pub mod command;
pub mod event;
pub mod interaction;
pub mod mention;
pub mod token;
pub mod ui;

use crate::repo::acronym_repo::{AcronymRepository, RepoError};
use client::{ChatClient, TransportResult};
use command::{route_command, CommandOutcome, Subcommand};
use event::InboundEvent;
use interaction::{handle_action, handle_submission, ActionOutcome};
use log::{error, info, warn};
use mention::answer_mention;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use token::TokenError;
use ui::Reply;

pub type BotResult<T> = Result<T, BotError>;

#[derive(Debug)]
pub enum BotError {
    Repo(RepoError),
    Token(TokenError),
}

impl Display for BotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Token(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Token(err) => Some(err),
        }
    }
}

impl From<RepoError> for BotError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TokenError> for BotError {
    fn from(value: TokenError) -> Self {
        Self::Token(value)
    }
}

/// Event dispatcher owning the store handle.
pub struct Bot<R: AcronymRepository> {
    repo: R,
}

impl<R: AcronymRepository> Bot<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Releases the store, e.g. to close it on shutdown.
    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Handles one inbound event.
    ///
    /// Returns the reply to send as the event acknowledgment, when the
    /// event kind expects one. Other effects go through `client`.
    ///
    /// # Errors
    /// - Store failures and undecodable tokens; nothing has been sent then.
    pub fn handle<C>(&self, event: &InboundEvent, client: &C) -> BotResult<Option<Reply>>
    where
        C: ChatClient + ?Sized,
    {
        let started_at = Instant::now();
        let result = self.dispatch(event, client);
        match &result {
            Ok(_) => info!(
                "event=bot_event module=bot status=ok kind={} duration_ms={}",
                event.kind(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=bot_event module=bot status=error kind={} duration_ms={} error={}",
                event.kind(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn dispatch<C>(&self, event: &InboundEvent, client: &C) -> BotResult<Option<Reply>>
    where
        C: ChatClient + ?Sized,
    {
        match event {
            InboundEvent::Command(command) => {
                info!(
                    "event=command_received module=bot subcommand={}",
                    Subcommand::parse(&command.text).label()
                );
                match route_command(&self.repo, command)? {
                    CommandOutcome::Reply(reply) => Ok(Some(reply)),
                    CommandOutcome::OpenDialog(dialog) => {
                        log_transport(
                            "open_dialog",
                            client.open_dialog(&command.trigger_id, &dialog),
                        );
                        Ok(None)
                    }
                }
            }
            InboundEvent::Action(action) => {
                match handle_action(&self.repo, action)? {
                    ActionOutcome::Replace(reply) => match action.response_url.as_deref() {
                        Some(url) => log_transport("respond", client.respond(url, &reply)),
                        None => warn!(
                            "event=bot_respond module=bot status=skipped reason=missing_response_url action={}",
                            action.action.as_str()
                        ),
                    },
                    ActionOutcome::OpenDialog(dialog) => log_transport(
                        "open_dialog",
                        client.open_dialog(&action.trigger_id, &dialog),
                    ),
                }
                Ok(None)
            }
            InboundEvent::Submission(submission) => {
                let notice = handle_submission(&self.repo, submission)?;
                log_transport(
                    "post_ephemeral",
                    client.post_ephemeral(&notice.channel_id, &notice.user_id, &notice.text),
                );
                Ok(None)
            }
            InboundEvent::Mention(mention) => {
                let text = answer_mention(&self.repo, &mention.text)?;
                log_transport(
                    "post_message",
                    client.post_message(&mention.channel_id, &text),
                );
                Ok(None)
            }
        }
    }
}

fn log_transport(operation: &str, result: TransportResult<()>) {
    if let Err(err) = result {
        error!(
            "event=transport_call module=bot status=error operation={} error={}",
            operation, err
        );
    }
}
