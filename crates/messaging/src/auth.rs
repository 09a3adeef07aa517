use {
    courier_config::LivePersonConfig,
    secrecy::Secret,
    serde::Deserialize,
    tracing::{debug, info},
};

use crate::{Error, Result, endpoints::signup_url};

#[derive(Deserialize)]
struct SignupResponse {
    #[serde(default)]
    jwt: Option<String>,
}

/// Obtain a consumer JWT from the identity provider.
///
/// The signup call takes no body. A non-2xx status is a protocol error; a
/// body that is not JSON is a parse error.
pub async fn fetch_jwt(
    client: &reqwest::Client,
    liveperson: &LivePersonConfig,
) -> Result<Secret<String>> {
    let url = signup_url(liveperson)?;
    debug!(url = %url, "requesting consumer JWT");

    let resp = client.post(url).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(Error::protocol(format!(
            "token request failed ({status}): {body}"
        )));
    }

    let parsed: SignupResponse = serde_json::from_str(&body)?;
    let jwt = parsed
        .jwt
        .filter(|jwt| !jwt.is_empty())
        .ok_or_else(|| Error::protocol("token response has no jwt"))?;

    info!(account_id = %liveperson.account_id, "consumer JWT acquired");
    Ok(Secret::new(jwt))
}
