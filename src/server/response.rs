//! JSON replies

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of the not-found reply
pub const NOT_FOUND_MESSAGE: &str = "Frames not found. Navigate to /list for list of frames. Navigate to https://github.com/hugomd/ascii-live to submit new frames.";

/// Body of the reply to non-curl clients
pub const NOT_CURLED_MESSAGE: &str =
    "You almost ruined a good surprise. Come on, curl it in terminal.";

/// Body of the refresh acknowledgement
pub const UPDATE_MESSAGE: &str = "Frames updated.";

/// Body of the reply for a sequence with no frames
pub const EMPTY_FRAMES_MESSAGE: &str = "Frames are empty.";

/// `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable error
    pub error: String,
}

/// `{"message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human readable status
    pub message: String,
}

/// `{"frames": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameList {
    /// Sequence names
    pub frames: Vec<String>,
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

/// 404 for unknown sequences and unknown routes
pub fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

/// 417 for clients that are not curl
pub fn not_curled() -> Response {
    error(StatusCode::EXPECTATION_FAILED, NOT_CURLED_MESSAGE)
}

/// 500 for a sequence that cannot be played
pub fn empty_sequence() -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, EMPTY_FRAMES_MESSAGE)
}

/// 200 acknowledging a refresh
pub fn updated() -> Response {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: UPDATE_MESSAGE.to_owned(),
        }),
    )
        .into_response()
}

/// 200 listing sequence names
pub fn listing(frames: Vec<String>) -> Response {
    (StatusCode::OK, Json(FrameList { frames })).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::header::CONTENT_TYPE;

    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_not_found() {
        let resp = not_found();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

        let body = body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "error": NOT_FOUND_MESSAGE }));
    }

    #[tokio::test]
    async fn test_not_curled() {
        let resp = not_curled();
        assert_eq!(resp.status(), StatusCode::EXPECTATION_FAILED);

        let body = body_json(resp).await;
        assert_eq!(body["error"], NOT_CURLED_MESSAGE);
    }

    #[tokio::test]
    async fn test_updated() {
        let body = body_json(updated()).await;
        assert_eq!(body, serde_json::json!({ "message": "Frames updated." }));
    }

    #[tokio::test]
    async fn test_listing() {
        let resp = listing(vec!["a".into(), "b".into()]);
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "frames": ["a", "b"] }));
    }
}
