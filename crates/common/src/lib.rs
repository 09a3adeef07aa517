//! Secret serde helpers and timestamp utilities used across all courier
//! crates.

pub mod secret;
pub mod time;
