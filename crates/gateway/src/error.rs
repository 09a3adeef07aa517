use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde_json::json,
};

/// Error answer for API callers: `{"error":{"kind":..,"message":..}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": {
                    "kind": self.kind,
                    "message": self.message,
                }
            })),
        )
            .into_response()
    }
}

impl From<courier_messaging::Error> for ApiError {
    fn from(err: courier_messaging::Error) -> Self {
        use courier_messaging::Error as E;
        let status = match &err {
            E::Http(_) | E::WebSocket(_) | E::Parse(_) | E::Protocol { .. } | E::ChannelClosed => {
                StatusCode::BAD_GATEWAY
            },
            E::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            E::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<courier_history::Error> for ApiError {
    fn from(err: courier_history::Error) -> Self {
        use courier_history::Error as E;
        let status = match &err {
            E::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            E::Transport(_) => StatusCode::BAD_GATEWAY,
            E::Io { .. } | E::Oauth(_) | E::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}
