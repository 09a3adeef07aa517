#![allow(clippy::unwrap_used)]

use {
    courier_config::{HistoryConfig, LivePersonConfig, SignaturePlacement},
    courier_history::{HistoryClient, write_output},
    mockito::Matcher,
    secrecy::Secret,
};

const SEARCH_PATH: &str = "/messaging_history/api/account/1234/conversations/conversation/search";

fn liveperson(history_url: String) -> LivePersonConfig {
    LivePersonConfig {
        account_id: "1234".into(),
        history_url,
        ..Default::default()
    }
}

fn history(placement: SignaturePlacement) -> HistoryConfig {
    HistoryConfig {
        conversation_id: "conv-1".into(),
        placement,
        consumer_key: "ck".into(),
        consumer_secret: Secret::new("cs".into()),
        token_key: "tk".into(),
        token_secret: Secret::new("ts".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn form_placement_sends_conversation_and_oauth_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("v".into(), "2".into()))
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("conversationId=conv-1".into()),
            Matcher::Regex("oauth_consumer_key=ck".into()),
            Matcher::Regex("oauth_token=tk".into()),
            Matcher::Regex("oauth_signature_method=HMAC-SHA1".into()),
            Matcher::Regex("oauth_signature=".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"conversationHistoryRecords":[]}"#)
        .create_async()
        .await;

    let client = HistoryClient::new(
        reqwest::Client::new(),
        &liveperson(server.url()),
        &history(SignaturePlacement::Form),
    )
    .unwrap();
    let resp = client.search("conv-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(resp.status.as_u16(), 200);
    assert_eq!(resp.content_type.as_deref(), Some("application/json"));
    assert_eq!(&resp.body[..], br#"{"conversationHistoryRecords":[]}"#);
}

#[tokio::test]
async fn header_placement_keeps_form_to_request_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("v".into(), "2".into()))
        .match_header(
            "authorization",
            Matcher::Regex(r#"^OAuth oauth_consumer_key="ck", .*oauth_signature=""#.into()),
        )
        .match_body(Matcher::Exact("conversationId=conv-1".into()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = HistoryClient::new(
        reqwest::Client::new(),
        &liveperson(server.url()),
        &history(SignaturePlacement::Header),
    )
    .unwrap();
    client.search("conv-1").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn upstream_error_status_is_returned_not_raised() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "text/plain")
        .with_body("signature invalid")
        .create_async()
        .await;

    let client = HistoryClient::new(
        reqwest::Client::new(),
        &liveperson(server.url()),
        &history(SignaturePlacement::Form),
    )
    .unwrap();
    let resp = client.search("conv-1").await.unwrap();
    assert_eq!(resp.status.as_u16(), 401);
    assert_eq!(&resp.body[..], b"signature invalid");
}

#[tokio::test]
async fn unreachable_upstream_is_transport_error() {
    let client = HistoryClient::new(
        reqwest::Client::new(),
        &liveperson("http://127.0.0.1:1".into()),
        &history(SignaturePlacement::Form),
    )
    .unwrap();
    let err = client.search("conv-1").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn response_body_lands_in_output_file_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let body = "{\"records\":[1,2,3]}\n  trailing whitespace kept ";
    let _mock = server
        .mock("POST", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.txt");
    std::fs::write(&path, "stale").unwrap();

    let client = HistoryClient::new(
        reqwest::Client::new(),
        &liveperson(server.url()),
        &history(SignaturePlacement::Form),
    )
    .unwrap();
    let resp = client.search("conv-1").await.unwrap();
    write_output(&path, &resp.body).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
}
