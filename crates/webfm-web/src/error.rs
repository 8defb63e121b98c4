use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use webfm_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
    Timeout(String),
    /// A failed file operation: `context` is the short status shown to the
    /// user, `source` carries the detail.
    Operation {
        context: &'static str,
        source: CoreError,
    },
}

impl AppError {
    pub fn op(context: &'static str, source: CoreError) -> Self {
        AppError::Operation { context, source }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

pub fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::PermissionDenied(_) | CoreError::CommandRejected(_) => StatusCode::FORBIDDEN,
        CoreError::NotADirectory(_)
        | CoreError::NotAFile(_)
        | CoreError::AlreadyExists(_)
        | CoreError::InvalidName(_)
        | CoreError::InvalidPattern { .. }
        | CoreError::InvalidMode(_)
        | CoreError::EmptyInput(_)
        | CoreError::UnknownTag { .. } => StatusCode::BAD_REQUEST,
        CoreError::ConfigParse(_) | CoreError::Archive(_) | CoreError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg, None),
            AppError::Internal(msg) => {
                // Log the real error server-side, return generic message to client
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Operation { context, source } => {
                let status = status_for(&source);
                if status.is_server_error() {
                    tracing::error!("{context}: {source}");
                } else {
                    tracing::warn!("{context}: {source}");
                }
                (status, context.to_string(), Some(source.to_string()))
            }
        };

        let body = ErrorBody {
            success: false,
            error,
            detail,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", e);
        AppError::Internal("Internal server error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_found_maps_to_404() {
        let err = CoreError::NotFound(PathBuf::from("/nope"));
        assert_eq!(status_for(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejections_map_to_403() {
        assert_eq!(
            status_for(&CoreError::PermissionDenied(PathBuf::from("/root"))),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&CoreError::CommandRejected("disabled".into())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn caller_mistakes_map_to_400() {
        let cases = [
            CoreError::EmptyInput("search text"),
            CoreError::UnknownTag {
                kind: "copy policy",
                tag: "sometimes".into(),
            },
            CoreError::InvalidMode("999".into()),
            CoreError::InvalidPattern {
                pattern: "(".into(),
                message: "unclosed group".into(),
            },
        ];
        for err in &cases {
            assert_eq!(status_for(err), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn io_maps_to_500() {
        let err = CoreError::Io(std::io::Error::other("disk on fire"));
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn operation_response_carries_detail() {
        let response = AppError::op(
            "failed to delete file",
            CoreError::NotFound(PathBuf::from("/tmp/gone.txt")),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_response_is_500() {
        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
