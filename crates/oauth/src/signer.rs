use {
    base64::{Engine, engine::general_purpose::STANDARD},
    hmac::{Hmac, Mac},
    sha1::Sha1,
    tracing::trace,
    url::Url,
};

use crate::{
    Result,
    encode::{normalize_parameters, percent_encode},
    nonce::generate_nonce,
    types::{Credentials, SignedParams},
};

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

/// Signs requests for one consumer and (optionally) one access token.
#[derive(Debug, Clone)]
pub struct Oauth1Signer {
    consumer: Credentials,
    token: Option<Credentials>,
}

impl Oauth1Signer {
    pub fn new(consumer: Credentials, token: Option<Credentials>) -> Self {
        Self { consumer, token }
    }

    /// Sign a request with a fresh nonce and the current timestamp.
    ///
    /// `params` are the request parameters that take part in the signature
    /// (form-encoded body fields); query parameters are read from `url`.
    pub fn sign(&self, method: &str, url: &str, params: &[(String, String)]) -> Result<SignedParams> {
        self.sign_with(
            method,
            url,
            params,
            &generate_nonce(),
            courier_common::time::unix_now(),
        )
    }

    /// Sign with a caller-supplied nonce and timestamp.
    pub fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<SignedParams> {
        let url = Url::parse(url)?;

        let mut oauth = vec![
            ("oauth_consumer_key".to_string(), self.consumer.key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(token) = &self.token {
            oauth.push(("oauth_token".to_string(), token.key.clone()));
        }
        oauth.push(("oauth_version".to_string(), OAUTH_VERSION.to_string()));

        let base = signature_base_string(
            method,
            &url,
            params
                .iter()
                .chain(oauth.iter())
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        trace!(base = %base, "oauth1 signature base string");

        let signing_key = format!(
            "{}&{}",
            self.consumer.encoded_secret(),
            self.token
                .as_ref()
                .map(Credentials::encoded_secret)
                .unwrap_or_default()
        );
        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())?;
        mac.update(base.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        oauth.push(("oauth_signature".to_string(), signature));
        Ok(SignedParams { params: oauth })
    }
}

/// Signature base string (RFC 5849 §3.4.1): method, base string URI and the
/// normalized parameters (request params plus the URL's query), each
/// percent-encoded and joined with `&`.
pub fn signature_base_string<'a, I>(method: &str, url: &Url, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut all: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    all.extend(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));
    let normalized = normalize_parameters(all.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&base_string_uri(url)),
        percent_encode(&normalized)
    )
}

/// Scheme, host, non-default port and path; no query or fragment
/// (RFC 5849 §3.4.1.2).
fn base_string_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    // `Url::port` is already `None` for the scheme's default port.
    match url.port() {
        Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
        None => format!("{}://{host}{}", url.scheme(), url.path()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use {super::*, secrecy::Secret};

    fn twitter_signer() -> Oauth1Signer {
        Oauth1Signer::new(
            Credentials::new(
                "xvz1evFS4wEEPTGEFPHBog",
                Secret::new("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into()),
            ),
            Some(Credentials::new(
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
                Secret::new("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into()),
            )),
        )
    }

    #[test]
    fn matches_published_reference_signature() {
        let params = vec![
            ("include_entities".to_string(), "true".to_string()),
            (
                "status".to_string(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            ),
        ];
        let signed = twitter_signer()
            .sign_with(
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json",
                &params,
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
                1318622958,
            )
            .unwrap();
        assert_eq!(signed.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn query_parameters_are_signed() {
        let signer = twitter_signer();
        let in_query = signer
            .sign_with(
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
                &[(
                    "status".to_string(),
                    "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
                )],
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
                1318622958,
            )
            .unwrap();
        assert_eq!(in_query.signature(), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn protocol_params_in_order_with_signature_last() {
        let signed = twitter_signer()
            .sign_with("post", "https://example.com/a", &[], "n", 1)
            .unwrap();
        assert_eq!(signed.get("oauth_signature_method"), Some("HMAC-SHA1"));
        assert_eq!(signed.get("oauth_version"), Some("1.0"));
        let names: Vec<String> = signed.into_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec![
            "oauth_consumer_key",
            "oauth_nonce",
            "oauth_signature_method",
            "oauth_timestamp",
            "oauth_token",
            "oauth_version",
            "oauth_signature",
        ]);
    }

    #[test]
    fn without_token_omits_oauth_token() {
        let signer = Oauth1Signer::new(Credentials::new("ck", Secret::new("cs".into())), None);
        let signed = signer.sign("GET", "https://example.com/", &[]).unwrap();
        assert!(signed.get("oauth_token").is_none());
        assert!(!signed.signature().is_empty());
    }

    #[test]
    fn base_string_drops_default_port_and_keeps_custom() {
        let url = Url::parse("HTTPS://Example.COM:443/r%20v/X?id=123").unwrap();
        let base = signature_base_string("get", &url, Vec::<(&str, &str)>::new());
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fexample.com%2Fr%2520v%2FX&id%3D123"
        );

        let url = Url::parse("http://example.com:8080/").unwrap();
        assert_eq!(
            signature_base_string("POST", &url, [("a", "1")]),
            "POST&http%3A%2F%2Fexample.com%3A8080%2F&a%3D1"
        );
    }

    #[test]
    fn base_string_sorts_params_and_query_together() {
        let url = Url::parse("https://example.com/search?v=2&b=x%20y").unwrap();
        let params = vec![("conversationId".to_string(), "c1".to_string())];
        let base = signature_base_string(
            "POST",
            &url,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fexample.com%2Fsearch&b%3Dx%2520y%26conversationId%3Dc1%26v%3D2"
        );
    }

    #[test]
    fn fresh_signatures_use_distinct_nonces() {
        let signer = twitter_signer();
        let a = signer.sign("POST", "https://example.com/", &[]).unwrap();
        let b = signer.sign("POST", "https://example.com/", &[]).unwrap();
        assert_ne!(a.get("oauth_nonce"), b.get("oauth_nonce"));
    }
}
