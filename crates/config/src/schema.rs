//! Config schema types (server, http, liveperson, messaging, history).
use std::{fmt, path::PathBuf, time::Duration};

use {
    courier_common::secret::{redact, serialize_secret},
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub liveperson: LivePersonConfig,
    pub messaging: MessagingConfig,
    pub history: HistoryConfig,
}

/// Gateway server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

/// Outbound HTTP client settings shared by the token and history calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout. `0` disables it.
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// LivePerson account and service base URLs.
///
/// Endpoint paths are derived from these by the messaging and history crates,
/// so pointing a base URL at a local server is enough for tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LivePersonConfig {
    /// Brand account id, used in every endpoint path.
    pub account_id: String,
    /// Identity provider base URL (JWT signup).
    pub idp_url: String,
    /// Messaging service base URL (`wss://`).
    pub messaging_url: String,
    /// Messaging history service base URL.
    pub history_url: String,
}

impl Default for LivePersonConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            idp_url: "https://va.idp.liveperson.net".into(),
            messaging_url: "wss://va.msg.liveperson.net".into(),
            history_url: "https://va.msghist.liveperson.net".into(),
        }
    }
}

/// Consumer messaging session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// Text published into the new conversation.
    pub greeting: String,
    pub connect_timeout_secs: u64,
    /// How long to wait for the response to a request frame.
    pub response_timeout_secs: u64,
    /// Wait for the publish response before closing the socket.
    pub await_publish_ack: bool,
}

impl MessagingConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello World!".into(),
            connect_timeout_secs: 10,
            response_timeout_secs: 30,
            await_publish_ack: false,
        }
    }
}

/// Where the OAuth 1.0a protocol parameters travel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignaturePlacement {
    /// `oauth_*` parameters are sent in the form body next to the request
    /// parameters.
    #[default]
    Form,
    /// `oauth_*` parameters are sent in an `Authorization: OAuth ...` header.
    Header,
}

impl fmt::Display for SignaturePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form => f.write_str("form"),
            Self::Header => f.write_str("header"),
        }
    }
}

/// Messaging history search settings and OAuth 1.0a credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Conversation searched when the request does not name one.
    pub conversation_id: String,
    /// File overwritten with the raw upstream body on every search.
    pub output_path: PathBuf,
    pub placement: SignaturePlacement,
    pub consumer_key: String,
    #[serde(serialize_with = "serialize_secret")]
    pub consumer_secret: Secret<String>,
    pub token_key: String,
    #[serde(serialize_with = "serialize_secret")]
    pub token_secret: Secret<String>,
}

impl fmt::Debug for HistoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryConfig")
            .field("conversation_id", &self.conversation_id)
            .field("output_path", &self.output_path)
            .field("placement", &self.placement)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &redact(&self.consumer_secret))
            .field("token_key", &self.token_key)
            .field("token_secret", &redact(&self.token_secret))
            .finish()
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            conversation_id: String::new(),
            output_path: PathBuf::from("output.txt"),
            placement: SignaturePlacement::Form,
            consumer_key: String::new(),
            consumer_secret: Secret::new(String::new()),
            token_key: String::new(),
            token_secret: Secret::new(String::new()),
        }
    }
}
