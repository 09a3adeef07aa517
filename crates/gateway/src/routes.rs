use {
    axum::{
        Json,
        body::Body,
        extract::{Query, State},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    courier_history::{HistoryClient, write_output},
    courier_messaging::run_greeting,
    serde::Deserialize,
    tracing::{info, warn},
};

use crate::{error::ApiError, state::AppState};

/// `GET /`: token, socket, conversation, greeting, close.
pub async fn greeting_handler(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = run_greeting(&state.http, &state.config.liveperson, &state.config.messaging).await?;
    Ok(Json(serde_json::json!({
        "conversationId": outcome.conversation_id,
        "published": true,
        "publishRequestId": outcome.publish_request_id,
        "acknowledged": outcome.acknowledged,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationQuery {
    pub conversation_id: Option<String>,
}

/// `GET /conversation`: signed history search.
///
/// The upstream body is written to the output file and forwarded with the
/// upstream status and content type, whatever the status.
pub async fn conversation_handler(
    State(state): State<AppState>,
    Query(query): Query<ConversationQuery>,
) -> Result<Response, ApiError> {
    let history = &state.config.history;
    let conversation_id = query
        .conversation_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| history.conversation_id.clone());

    let client = HistoryClient::new(state.http.clone(), &state.config.liveperson, history)?;
    let resp = client.search(&conversation_id).await?;

    // The caller still gets the upstream answer when the file cannot be written.
    if let Err(e) = write_output(&history.output_path, &resp.body).await {
        warn!(error = %e, "could not store history response");
    } else {
        info!(path = %history.output_path.display(), "history response stored");
    }

    let mut builder = Response::builder().status(resp.status);
    if let Some(content_type) = resp.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(resp.body)).map_err(|e| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string())
    })
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
    }))
}
