use secrecy::{ExposeSecret, Secret};

use crate::encode::percent_encode;

/// A key/secret pair (consumer or access token).
#[derive(Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: Secret<String>,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: Secret<String>) -> Self {
        Self {
            key: key.into(),
            secret,
        }
    }

    pub(crate) fn encoded_secret(&self) -> String {
        percent_encode(self.secret.expose_secret()).into_owned()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &courier_common::secret::redact(&self.secret))
            .finish()
    }
}

/// The `oauth_*` protocol parameters of a signed request, signature last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    pub(crate) params: Vec<(String, String)>,
}

impl SignedParams {
    /// The base64 `oauth_signature` value.
    pub fn signature(&self) -> &str {
        self.get("oauth_signature").unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Protocol parameters as form pairs, for requests that carry them in
    /// the body.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.params
    }

    /// `Authorization` header value (RFC 5849 §3.5.1).
    pub fn authorization_header(&self) -> String {
        let fields = self
            .params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {fields}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_quotes_and_encodes_values() {
        let signed = SignedParams {
            params: vec![
                ("oauth_consumer_key".into(), "ck".into()),
                ("oauth_signature".into(), "a+b/c=".into()),
            ],
        };
        assert_eq!(
            signed.authorization_header(),
            r#"OAuth oauth_consumer_key="ck", oauth_signature="a%2Bb%2Fc%3D""#
        );
        assert_eq!(signed.signature(), "a+b/c=");
    }

    #[test]
    fn debug_hides_secret() {
        let creds = Credentials::new("key", Secret::new("shh".into()));
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("key"));
        assert!(!dbg.contains("shh"));
    }
}
