//! LivePerson endpoint URLs derived from the configured service hosts.

use {courier_config::LivePersonConfig, courier_protocol::API_VERSION, url::Url};

use crate::{Error, Result};

/// `POST {idp}/api/account/{account}/signup`: unauthenticated consumer
/// signup that answers with `{"jwt": ...}`.
pub fn signup_url(liveperson: &LivePersonConfig) -> Result<Url> {
    let account = account_segment(liveperson)?;
    let url = format!(
        "{}/api/account/{account}/signup",
        liveperson.idp_url.trim_end_matches('/')
    );
    Ok(Url::parse(&url)?)
}

/// Consumer messaging socket for API version 3.
pub fn consumer_socket_url(liveperson: &LivePersonConfig) -> Result<Url> {
    let account = account_segment(liveperson)?;
    let url = format!(
        "{}/ws_api/account/{account}/messaging/consumer?v={API_VERSION}",
        liveperson.messaging_url.trim_end_matches('/')
    );
    let url = Url::parse(&url)?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(Error::config(format!(
            "messaging_url must use ws or wss, got {other}"
        ))),
    }
}

fn account_segment(liveperson: &LivePersonConfig) -> Result<String> {
    let account = liveperson.account_id.trim();
    if account.is_empty() {
        return Err(Error::config("liveperson.account_id is not set"));
    }
    Ok(urlencoding::encode(account).into_owned())
}
