//! Slack request signature verification.
//!
//! # Invariants
//! - The signed base string is `v0:{timestamp}:{raw body}`, keyed with the
//!   app signing secret (HMAC-SHA256, lowercase hex, `v0=` prefix).
//! - Timestamps further than [`MAX_CLOCK_SKEW_SECS`] from now are refused.
//! - Digest comparison is constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const MAX_CLOCK_SKEW_SECS: u64 = 60 * 5;

const VERSION_PREFIX: &str = "v0=";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    MissingHeader(&'static str),
    InvalidTimestamp,
    StaleTimestamp { timestamp: u64, now: u64 },
    Malformed,
    Mismatch,
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader(name) => write!(f, "missing `{name}` header"),
            Self::InvalidTimestamp => write!(f, "request timestamp is not a unix time"),
            Self::StaleTimestamp { timestamp, now } => {
                write!(f, "request timestamp {timestamp} is too far from {now}")
            }
            Self::Malformed => write!(f, "signature is not a `v0=` hex digest"),
            Self::Mismatch => write!(f, "signature does not match"),
        }
    }
}

impl Error for SignatureError {}

/// Checks request signatures against one signing secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Verifies the raw request body against the Slack signature headers.
    ///
    /// `now` is the current unix time in seconds.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now: u64,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        let issued_at: u64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp)?;
        if issued_at.abs_diff(now) > MAX_CLOCK_SKEW_SECS {
            return Err(SignatureError::StaleTimestamp {
                timestamp: issued_at,
                now,
            });
        }

        let digest = signature
            .trim()
            .strip_prefix(VERSION_PREFIX)
            .and_then(|hex_digest| hex::decode(hex_digest).ok())
            .ok_or(SignatureError::Malformed)?;

        self.mac(timestamp.trim(), body)
            .verify_slice(&digest)
            .map_err(|_| SignatureError::Mismatch)
    }

    #[cfg(test)]
    pub(crate) fn sign(&self, timestamp: &str, body: &[u8]) -> String {
        let digest = self.mac(timestamp, body).finalize().into_bytes();
        format!("{VERSION_PREFIX}{}", hex::encode(digest))
    }

    fn mac(&self, timestamp: &str, body: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts keys of any length");
        mac.update(b"v0:");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);
        mac
    }
}
