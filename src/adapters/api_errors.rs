use {
    super::api::json_response,
    crate::domain::error::ValidationError,
    axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Everything the gateway answers with a non-2xx status.
///
/// Provider failures are not in here: they degrade to the app store
/// fallback in the handler.
#[derive(Debug)]
pub enum ApiError {
    MethodNotAllowed,
    Validation(ValidationError),
    Unexpected(String),
    Panic(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MethodNotAllowed => (
                StatusCode::FORBIDDEN,
                "Only GET method supported".to_string(),
            ),
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Unexpected(msg) => {
                tracing::error!("unexpected error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            Self::Panic(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("panic recovered. Details:{details}"),
            ),
        };

        json_response(status, &ErrorBody { error: message })
    }
}
