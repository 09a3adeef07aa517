//! LivePerson consumer messaging.
//!
//! Fetches a consumer JWT, opens one authenticated socket per handshake,
//! requests a conversation and publishes a text message into it. Responses
//! are matched to requests by id; frames that answer nothing are ignored.

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod greeting;
pub mod session;
pub mod state;

pub use {
    auth::fetch_jwt,
    error::{Error, Result},
    greeting::{GreetingOutcome, run_greeting},
    session::{MessagingSession, SessionOptions},
    state::ChannelState,
};
