//! Configuration validation.
//!
//! Detects unknown or misspelled fields, unresolved `${ENV}` placeholders,
//! malformed endpoint URLs and missing credentials.

use std::{collections::HashMap, path::Path};

use {secrecy::ExposeSecret, url::Url};

use crate::{
    env_subst::substitute_env_report,
    loader::{find_config_file, parse_config, parse_config_value},
    schema::CourierConfig,
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "env", "url",
    /// "credentials", "timeout", "messaging", "history", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "liveperson.idp_url"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Returns `true` if any diagnostic points at the dotted `path`.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.diagnostics.iter().any(|d| d.path == path)
    }
}

// ── Schema tree for unknown-field detection ─────────────────────────────────

enum KnownKeys {
    Struct(HashMap<&'static str, KnownKeys>),
    Leaf,
}

fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Leaf, Struct};

    Struct(HashMap::from([
        (
            "server",
            Struct(HashMap::from([("bind", Leaf), ("port", Leaf)])),
        ),
        ("http", Struct(HashMap::from([("timeout_secs", Leaf)]))),
        (
            "liveperson",
            Struct(HashMap::from([
                ("account_id", Leaf),
                ("idp_url", Leaf),
                ("messaging_url", Leaf),
                ("history_url", Leaf),
            ])),
        ),
        (
            "messaging",
            Struct(HashMap::from([
                ("greeting", Leaf),
                ("connect_timeout_secs", Leaf),
                ("response_timeout_secs", Leaf),
                ("await_publish_ack", Leaf),
            ])),
        ),
        (
            "history",
            Struct(HashMap::from([
                ("conversation_id", Leaf),
                ("output_path", Leaf),
                ("placement", Leaf),
                ("consumer_key", Leaf),
                ("consumer_secret", Leaf),
                ("token_key", Leaf),
                ("token_secret", Leaf),
            ])),
        ),
    ]))
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or the discovered config file
/// when `path` is `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

    let Some(actual_path) = config_path else {
        let mut result = validate_config(&CourierConfig::default());
        result.diagnostics.insert(
            0,
            Diagnostic::new(
                Severity::Info,
                "file-ref",
                "",
                "no config file found; using defaults",
            ),
        );
        return result;
    };

    let mut result = match std::fs::read_to_string(&actual_path) {
        Ok(content) => validate_str(&content, &actual_path),
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("failed to read config file: {e}"),
            )],
            config_path: None,
        },
    };
    result.config_path = Some(actual_path);
    result
}

/// Validate raw config text. The format is taken from `path`'s extension;
/// the file itself is not read.
#[must_use]
pub fn validate_str(raw: &str, path: &Path) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let substitution = substitute_env_report(raw);
    for name in &substitution.unresolved {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "env",
            "",
            format!("environment variable ${{{name}}} is not set"),
        ));
    }

    let tree = match parse_config_value(&substitution.output, path) {
        Ok(tree) => tree,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("syntax error: {e}"),
            ));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    check_unknown_fields(&tree, &build_schema_map(), "", &mut diagnostics);

    match parse_config(&substitution.output, path) {
        Ok(config) => diagnostics.extend(validate_config(&config).diagnostics),
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        )),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// Semantic checks on an already-parsed config.
#[must_use]
pub fn validate_config(config: &CourierConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    let diagnostics = &mut result.diagnostics;

    let lp = &config.liveperson;
    if lp.account_id.trim().is_empty() || lp.account_id.contains("${") {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "credentials",
            "liveperson.account_id",
            "account id is required",
        ));
    }

    check_url(&lp.idp_url, "liveperson.idp_url", &["https", "http"], diagnostics);
    check_url(
        &lp.messaging_url,
        "liveperson.messaging_url",
        &["wss", "ws"],
        diagnostics,
    );
    check_url(
        &lp.history_url,
        "liveperson.history_url",
        &["https", "http"],
        diagnostics,
    );

    if config.messaging.response_timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "timeout",
            "messaging.response_timeout_secs",
            "must be greater than zero",
        ));
    }
    if config.messaging.connect_timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "timeout",
            "messaging.connect_timeout_secs",
            "must be greater than zero",
        ));
    }
    if config.messaging.greeting.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "messaging",
            "messaging.greeting",
            "greeting is empty; an empty message will be published",
        ));
    }

    let history = &config.history;
    for (path, value) in [
        ("history.consumer_key", history.consumer_key.as_str()),
        (
            "history.consumer_secret",
            history.consumer_secret.expose_secret().as_str(),
        ),
        ("history.token_key", history.token_key.as_str()),
        (
            "history.token_secret",
            history.token_secret.expose_secret().as_str(),
        ),
    ] {
        if value.trim().is_empty() || value.contains("${") {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "credentials",
                path,
                "missing; GET /conversation will fail",
            ));
        }
    }
    if history.conversation_id.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            "history",
            "history.conversation_id",
            "no default conversation; requests must pass ?conversationId=",
        ));
    }

    result
}

fn check_url(raw: &str, path: &str, schemes: &[&str], diagnostics: &mut Vec<Diagnostic>) {
    match Url::parse(raw) {
        Ok(url) if schemes.contains(&url.scheme()) => {},
        Ok(url) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "url",
            path,
            format!(
                "unsupported scheme \"{}\" (expected {})",
                url.scheme(),
                schemes.join(" or ")
            ),
        )),
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "url",
            path,
            format!("invalid URL \"{raw}\": {e}"),
        )),
    }
}

/// Walk the parsed tree against the schema tree and flag unknown keys.
fn check_unknown_fields(
    value: &serde_json::Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (serde_json::Value::Object(table), KnownKeys::Struct(fields)) = (value, schema) else {
        // Leaf or type mismatch: type errors are reported by deserialization.
        return;
    };

    let known_keys: Vec<&str> = fields.keys().copied().collect();
    for (key, child_value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let Some(child_schema) = fields.get(key.as_str()) {
            check_unknown_fields(child_value, child_schema, &path, diagnostics);
            continue;
        }
        let message = match suggest(key, &known_keys, 3) {
            Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
            None => "unknown field".to_string(),
        };
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "unknown-field",
            path,
            message,
        ));
    }
}
