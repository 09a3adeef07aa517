use {
    courier_config::{LivePersonConfig, MessagingConfig},
    serde::Serialize,
    tracing::{info, warn},
};

use crate::{
    Result,
    auth::fetch_jwt,
    endpoints::consumer_socket_url,
    session::{MessagingSession, SessionOptions},
};

/// What one greeting handshake accomplished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GreetingOutcome {
    pub conversation_id: String,
    pub publish_request_id: u64,
    /// Whether the service confirmed the publish. Only checked when
    /// `await_publish_ack` is set.
    pub acknowledged: bool,
}

/// Token, socket, conversation, greeting, close.
///
/// Every call opens its own socket, so concurrent greetings never share
/// state. The socket is closed whether or not the handshake succeeded.
pub async fn run_greeting(
    client: &reqwest::Client,
    liveperson: &LivePersonConfig,
    messaging: &MessagingConfig,
) -> Result<GreetingOutcome> {
    let url = consumer_socket_url(liveperson)?;
    let token = fetch_jwt(client, liveperson).await?;
    let session = MessagingSession::connect(&url, &token, SessionOptions::from(messaging)).await?;

    let result = greet(&session, messaging).await;
    session.close().await;

    match &result {
        Ok(outcome) => info!(
            conversation_id = %outcome.conversation_id,
            acknowledged = outcome.acknowledged,
            "greeting delivered"
        ),
        Err(e) => warn!(kind = e.kind(), error = %e, "greeting failed"),
    }
    result
}

async fn greet(session: &MessagingSession, messaging: &MessagingConfig) -> Result<GreetingOutcome> {
    let conversation_id = session.request_conversation().await?;
    let publish_request_id = session
        .publish_text(&conversation_id, &messaging.greeting, messaging.await_publish_ack)
        .await?;
    Ok(GreetingOutcome {
        conversation_id,
        publish_request_id,
        acknowledged: messaging.await_publish_ack,
    })
}
