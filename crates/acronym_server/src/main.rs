//! Slack-facing entry point for the acronym bot.
//!
//! # Responsibility
//! - Load configuration and fail fast when credentials are missing.
//! - Own the store handle for the process lifetime and close it after the
//!   listener stops on SIGINT/SIGTERM.

mod config;
mod http;
mod slack;

use acronym_core::db::{open_db, DbError};
use acronym_core::{init_logging, AcronymRepository, Bot, RepoError, SharedAcronymStore};
use config::{ConfigError, ServerConfig};
use http::Listener;
use log::{error, info};
use slack::signature::SignatureVerifier;
use slack::web_api::SlackWebClient;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug)]
enum StartupError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Http(String),
    Signal(ctrlc::Error),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) | Self::Http(message) => write!(f, "{message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Signal(err) => write!(f, "failed to install shutdown handler: {err}"),
        }
    }
}

impl From<ConfigError> for StartupError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for StartupError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StartupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=server status=error error={}", err);
            eprintln!("acronym_server: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_target.clone()).map_err(StartupError::Logging)?;

    let store = SharedAcronymStore::new(open_db(&config.db_path)?);
    info!(
        "event=store_ready module=server status=ok path={} records={}",
        config.db_path.display(),
        store.count()?
    );

    let client = SlackWebClient::new(config.bot_token.as_str(), config.api_base.as_str())
        .map_err(|err| StartupError::Http(err.to_string()))?;
    let listener = Arc::new(
        Listener::bind(
            &config.bind_addr,
            config.http_workers,
            SignatureVerifier::new(&config.signing_secret),
        )
        .map_err(StartupError::Http)?,
    );

    let stopper = Arc::clone(&listener);
    ctrlc::set_handler(move || {
        info!("event=app_shutdown module=server status=requested");
        stopper.stop();
    })
    .map_err(StartupError::Signal)?;

    let bot = Bot::new(store);
    listener.serve(&bot, &client);

    bot.into_repo().close()?;
    info!("event=store_closed module=server status=ok");
    Ok(())
}
