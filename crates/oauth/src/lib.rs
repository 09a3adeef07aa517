//! OAuth 1.0a request signing (RFC 5849) with HMAC-SHA1.
//!
//! Produces the `oauth_*` protocol parameters for a request. Callers decide
//! whether they travel in the form body or an `Authorization` header.

pub mod encode;
pub mod error;
pub mod nonce;
pub mod signer;
pub mod types;

pub use {
    error::{Error, Result},
    signer::{Oauth1Signer, signature_base_string},
    types::{Credentials, SignedParams},
};
