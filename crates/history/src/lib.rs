//! Conversation history search against the LivePerson messaging history API.
//!
//! Requests are form-encoded and signed with OAuth 1.0a (HMAC-SHA1). The
//! response is never parsed: its body is stored verbatim and handed back.

pub mod client;
pub mod error;
pub mod output;

pub use {
    client::{HistoryClient, HistoryResponse, search_url},
    error::{Error, Result},
    output::write_output,
};
