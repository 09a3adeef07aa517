//! Configuration loading, validation and env substitution.
//!
//! Config files: `courier.toml`, `courier.yaml`, `courier.yml` or `courier.json`,
//! searched in `./` then `~/.config/courier/`, unless an explicit path is given.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in all string
//! values so credentials never have to live in the file itself.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, find_config_file, load_config, load_or_discover},
    schema::{
        CourierConfig, HistoryConfig, HttpConfig, LivePersonConfig, MessagingConfig,
        ServerConfig, SignaturePlacement,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_config, validate_str},
};
