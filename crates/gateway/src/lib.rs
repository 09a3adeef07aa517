//! HTTP gateway: `GET /` runs the greeting handshake, `GET /conversation`
//! runs the signed history search.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use {
    error::ApiError,
    server::{build_gateway_app, start_gateway},
    state::AppState,
};
