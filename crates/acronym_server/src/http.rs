//! HTTP listener for Slack deliveries.
//!
//! # Responsibility
//! - Route Slack endpoints to the payload decoders and the bot.
//! - Acknowledge every delivery with one synchronous response.
//!
//! # Invariants
//! - A fixed pool of worker threads serves requests; failures stay per
//!   request.
//! - Slack endpoints are signature-checked before their body is decoded;
//!   unsigned or forged requests answer 401 and never reach the store.
//! - Bodies larger than [`MAX_BODY_BYTES`] answer 413 without being buffered.
//! - Store failures answer 500, undecodable input answers 400.

use crate::slack::blocks::reply_body;
use crate::slack::payload::{
    decode_event, decode_interaction, decode_slash_command, Decoded, PayloadError,
};
use crate::slack::signature::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use acronym_core::{AcronymRepository, Bot, BotError, ChatClient};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::io::{Cursor, Read};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};
use tiny_http::{Header, Method, Request, Response, Server};

/// Upper bound for an accepted request body.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

type Decoder = fn(&str) -> Result<Decoded, PayloadError>;
type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Bound listener plus the worker pool settings used by [`Listener::serve`].
pub struct Listener {
    server: Server,
    workers: usize,
    verifier: SignatureVerifier,
    stopping: AtomicBool,
}

impl Listener {
    /// Binds the listener. `workers` is clamped to at least one.
    pub fn bind(addr: &str, workers: usize, verifier: SignatureVerifier) -> Result<Self, String> {
        let server =
            Server::http(addr).map_err(|err| format!("failed to bind `{addr}`: {err}"))?;
        Ok(Self {
            server,
            workers: workers.max(1),
            verifier,
            stopping: AtomicBool::new(false),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serves requests on the worker pool until [`Listener::stop`] is called.
    ///
    /// Returns once every worker has finished its current request, so the
    /// caller may release `bot` afterwards.
    pub fn serve<R, C>(&self, bot: &Bot<R>, client: &C)
    where
        R: AcronymRepository + Sync,
        C: ChatClient + Sync,
    {
        let addr = self
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unix".to_string());
        info!(
            "event=http_listen module=http status=ok addr={} workers={}",
            addr, self.workers
        );

        thread::scope(|scope| {
            for worker in 0..self.workers {
                scope.spawn(move || self.run_worker(worker, bot, client));
            }
        });

        info!("event=http_listen module=http status=stopped");
    }

    /// Asks every worker to return after its current request.
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        for _ in 0..self.workers {
            self.server.unblock();
        }
    }

    fn run_worker<R, C>(&self, worker: usize, bot: &Bot<R>, client: &C)
    where
        R: AcronymRepository,
        C: ChatClient,
    {
        loop {
            match self.server.recv() {
                Ok(request) => {
                    if let Err(err) = handle_request(request, &self.verifier, bot, client) {
                        error!(
                            "event=http_respond module=http status=error worker={} error={}",
                            worker, err
                        );
                    }
                }
                Err(_) if self.stopping.load(Ordering::SeqCst) => break,
                Err(err) => warn!(
                    "event=http_accept module=http status=error worker={} error={}",
                    worker, err
                ),
            }
        }
    }
}

fn handle_request<R, C>(
    mut request: Request,
    verifier: &SignatureVerifier,
    bot: &Bot<R>,
    client: &C,
) -> std::io::Result<()>
where
    R: AcronymRepository,
    C: ChatClient + ?Sized,
{
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    let method = request.method().clone();
    let decoder: Decoder = match (&method, path.as_str()) {
        (&Method::Get, "/healthz") => return request.respond(Response::from_string("ok")),
        (&Method::Post, "/slack/commands") => decode_slash_command,
        (&Method::Post, "/slack/interactions") => decode_interaction,
        (&Method::Post, "/slack/events") => decode_event,
        _ => {
            return request.respond(Response::from_string("Not found").with_status_code(404));
        }
    };

    let timestamp = header_value(&request, TIMESTAMP_HEADER);
    let signature = header_value(&request, SIGNATURE_HEADER);

    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)?;
    if body.len() as u64 > MAX_BODY_BYTES {
        warn!(
            "event=http_request module=http status=rejected path={} reason=body_too_large",
            path
        );
        return request.respond(Response::from_string("Payload too large").with_status_code(413));
    }

    if let Err(err) = verifier.verify(
        timestamp.as_deref(),
        signature.as_deref(),
        &body,
        unix_now(),
    ) {
        warn!(
            "event=http_request module=http status=unauthorized path={} error={}",
            path, err
        );
        return request.respond(Response::from_string("Unauthorized").with_status_code(401));
    }

    let Ok(body) = String::from_utf8(body) else {
        warn!(
            "event=http_request module=http status=rejected path={} reason=non_utf8_body",
            path
        );
        return request.respond(Response::from_string("Bad request").with_status_code(400));
    };

    let response = match decoder(&body) {
        Ok(Decoded::Event(event)) => match bot.handle(&event, client) {
            Ok(Some(reply)) => json_response(&reply_body(&reply)),
            Ok(None) => Response::from_string(""),
            Err(BotError::Token(err)) => {
                warn!(
                    "event=http_request module=http status=rejected path={} error={}",
                    path, err
                );
                Response::from_string("Bad request").with_status_code(400)
            }
            Err(BotError::Repo(err)) => {
                error!(
                    "event=http_request module=http status=error path={} error={}",
                    path, err
                );
                Response::from_string("Internal error").with_status_code(500)
            }
        },
        Ok(Decoded::Challenge(challenge)) => Response::from_string(challenge),
        Ok(Decoded::Ignored(reason)) => {
            debug!(
                "event=http_request module=http status=ignored path={} reason={}",
                path, reason
            );
            Response::from_string("")
        }
        Err(err) => {
            warn!(
                "event=http_request module=http status=rejected path={} error={}",
                path, err
            );
            Response::from_string("Bad request").with_status_code(400)
        }
    };

    request.respond(response)
}

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_string())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn json_response(body: &Value) -> HttpResponse {
    let response = Response::from_string(body.to_string());
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
