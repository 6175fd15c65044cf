//! Slack transport adapter: request signature checks, payload decoding,
//! Block Kit rendering and the Web API client.

pub mod blocks;
pub mod payload;
pub mod signature;
pub mod web_api;
