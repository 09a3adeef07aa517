use secrecy::{ExposeSecret, Secret};

/// Serialize a `Secret<String>` by exposing its inner value.
/// Use only for fields that must round-trip through config files.
pub fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Placeholder shown in `Debug` output instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// Redact a secret for `Debug` output, keeping empty values visible so a
/// missing credential is still obvious in logs.
#[must_use]
pub fn redact(secret: &Secret<String>) -> &'static str {
    if secret.expose_secret().is_empty() {
        "<empty>"
    } else {
        REDACTED
    }
}
