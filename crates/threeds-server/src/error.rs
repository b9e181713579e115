use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use threeds::ThreeDsError;

/// HTTP face of [`ThreeDsError`].
#[derive(Debug)]
pub struct ApiError(pub ThreeDsError);

impl From<ThreeDsError> for ApiError {
    fn from(e: ThreeDsError) -> Self {
        ApiError(e)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Machine-readable code for the `error` field.
    pub fn code(&self) -> &'static str {
        match self.0 {
            ThreeDsError::InvalidRequest(_) => "invalid_request",
            ThreeDsError::InvalidColorDepth(_) => "invalid_color_depth",
            ThreeDsError::NotFound(_) => "transaction_not_found",
            ThreeDsError::Unauthorized => "unauthorized",
            ThreeDsError::CardRangeNotFound => "card_range_not_found",
            ThreeDsError::Upstream(_) => "upstream_error",
            ThreeDsError::UnrecognizedOutcome { .. } => "unrecognized_outcome",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            ThreeDsError::InvalidRequest(_) | ThreeDsError::InvalidColorDepth(_) => {
                StatusCode::BAD_REQUEST
            }
            ThreeDsError::NotFound(_) | ThreeDsError::CardRangeNotFound => StatusCode::NOT_FOUND,
            ThreeDsError::Unauthorized => StatusCode::UNAUTHORIZED,
            ThreeDsError::Upstream(_) | ThreeDsError::UnrecognizedOutcome { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match &self.0 {
            ThreeDsError::Upstream(msg) => {
                tracing::error!("3DS server error: {}", msg);
                "Failed to reach the 3DS server".to_string()
            }
            ThreeDsError::UnrecognizedOutcome { version, status } => {
                tracing::error!(version = %version, status = %status, "unrecognized 3DS outcome");
                "The 3DS server returned an unsupported outcome".to_string()
            }
            ThreeDsError::Unauthorized => {
                tracing::error!("3DS server rejected the API key");
                "The 3DS server rejected our credentials".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ThreeDsError::InvalidRequest("x".into()), 400),
            (ThreeDsError::InvalidColorDepth(0), 400),
            (ThreeDsError::NotFound("t".into()), 404),
            (ThreeDsError::CardRangeNotFound, 404),
            (ThreeDsError::Unauthorized, 401),
            (ThreeDsError::Upstream("boom".into()), 502),
            (
                ThreeDsError::UnrecognizedOutcome {
                    version: "2.1.0".into(),
                    status: "C".into(),
                },
                502,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_code().as_u16(), expected);
        }
    }

    #[actix_rt::test]
    async fn test_upstream_detail_not_echoed() {
        let resp = ApiError(ThreeDsError::Upstream("secret host 10.0.0.1".into())).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("10.0.0.1"));
        assert!(body.contains("upstream_error"));
    }
}
