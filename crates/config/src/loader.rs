use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::CourierConfig};

/// Standard config file names, checked in order.
pub(crate) const CONFIG_FILENAMES: &[&str] = &[
    "courier.toml",
    "courier.yaml",
    "courier.yml",
    "courier.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<CourierConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./courier.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/courier/courier.{toml,yaml,yml,json}` (user-global)
///
/// Returns `CourierConfig::default()` if no config file is found.
pub fn discover_and_load() -> CourierConfig {
    load_found(find_config_file()).0
}

/// Load a discovered file, falling back to defaults. The returned path is
/// `None` whenever the defaults were used.
fn load_found(found: Option<PathBuf>) -> (CourierConfig, Option<PathBuf>) {
    let Some(path) = found else {
        debug!("no config file found, using defaults");
        return (CourierConfig::default(), None);
    };
    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => (cfg, Some(path)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            (CourierConfig::default(), None)
        },
    }
}

/// Load an explicit config file, or fall back to discovery.
///
/// An explicit path that cannot be loaded is an error rather than a silent
/// fallback to defaults. Returns the path the config came from, if any.
pub fn load_or_discover(path: Option<&Path>) -> anyhow::Result<(CourierConfig, Option<PathBuf>)> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading explicit config");
            Ok((load_config(path)?, Some(path.to_path_buf())))
        },
        None => Ok(load_found(find_config_file())),
    }
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/courier/
    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/courier/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "courier").map(|d| d.config_dir().to_path_buf())
}

pub(crate) fn parse_config(raw: &str, path: &Path) -> anyhow::Result<CourierConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

/// Parse into a format-neutral JSON tree (used for unknown-field detection).
pub(crate) fn parse_config_value(raw: &str, path: &Path) -> anyhow::Result<serde_json::Value> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
