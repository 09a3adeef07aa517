use {
    bytes::Bytes,
    courier_config::{HistoryConfig, LivePersonConfig, SignaturePlacement},
    courier_oauth::{Credentials, Oauth1Signer},
    reqwest::{StatusCode, header},
    tracing::{debug, info, warn},
    url::Url,
};

use crate::{Error, Result};

/// Raw upstream answer. The body is kept as bytes and never interpreted.
#[derive(Debug, Clone)]
pub struct HistoryResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// `POST {history}/messaging_history/api/account/{account}/conversations/conversation/search?v=2`
pub fn search_url(liveperson: &LivePersonConfig) -> Result<Url> {
    let account = liveperson.account_id.trim();
    if account.is_empty() {
        return Err(Error::config("liveperson.account_id is not set"));
    }
    let url = format!(
        "{}/messaging_history/api/account/{}/conversations/conversation/search?v=2",
        liveperson.history_url.trim_end_matches('/'),
        urlencoding::encode(account)
    );
    Ok(Url::parse(&url)?)
}

/// Signed client for the conversation search endpoint.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    http: reqwest::Client,
    url: Url,
    signer: Oauth1Signer,
    placement: SignaturePlacement,
}

impl HistoryClient {
    pub fn new(
        http: reqwest::Client,
        liveperson: &LivePersonConfig,
        history: &HistoryConfig,
    ) -> Result<Self> {
        let consumer = Credentials::new(&history.consumer_key, history.consumer_secret.clone());
        let token = (!history.token_key.is_empty())
            .then(|| Credentials::new(&history.token_key, history.token_secret.clone()));
        Ok(Self {
            http,
            url: search_url(liveperson)?,
            signer: Oauth1Signer::new(consumer, token),
            placement: history.placement,
        })
    }

    /// Search for one conversation by id.
    ///
    /// Any HTTP response, whatever its status, is returned as-is; only
    /// transport failures are errors.
    pub async fn search(&self, conversation_id: &str) -> Result<HistoryResponse> {
        if conversation_id.is_empty() {
            return Err(Error::config("no conversation id given"));
        }

        let mut form = vec![("conversationId".to_string(), conversation_id.to_string())];
        let signed = self.signer.sign("POST", self.url.as_str(), &form)?;

        let mut request = self.http.post(self.url.clone());
        match self.placement {
            SignaturePlacement::Form => form.extend(signed.into_pairs()),
            SignaturePlacement::Header => {
                request = request.header(header::AUTHORIZATION, signed.authorization_header());
            },
        }

        debug!(url = %self.url, placement = %self.placement, "searching conversation history");
        let resp = request.form(&form).send().await.inspect_err(|e| {
            warn!(error = %e, "history request failed");
        })?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp.bytes().await?;

        if status.is_success() {
            info!(conversation_id, status = status.as_u16(), bytes = body.len(), "history fetched");
        } else {
            warn!(conversation_id, status = status.as_u16(), bytes = body.len(), "history search rejected");
        }

        Ok(HistoryResponse {
            status,
            content_type,
            body,
        })
    }
}
