use {
    super::{PRODUCT_ID_PARAM, api_errors::ApiError, query_param},
    crate::{
        AppState,
        domain::{
            error::AggregateError,
            id::ProductId,
            payment::{APPLE_APP_URL, GOOGLE_APP_URL},
        },
    },
    axum::{
        extract::{RawQuery, State},
        http::{Method, StatusCode, header},
        response::{IntoResponse, Response},
    },
    serde::{Deserialize, Serialize},
    tokio_util::sync::CancellationToken,
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentUrlsResponse {
    #[serde(rename = "g_url")]
    pub google_pay_url: String,
    #[serde(rename = "a_url")]
    pub apple_pay_url: String,
}

/// Sent instead of payment URLs when a provider is down: the user is asked
/// to install the app rather than shown an error.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppUrlsResponse {
    pub apple_url: String,
    pub google_url: String,
}

impl Default for AppUrlsResponse {
    fn default() -> Self {
        Self {
            apple_url: APPLE_APP_URL.to_string(),
            google_url: GOOGLE_APP_URL.to_string(),
        }
    }
}

pub async fn payment_urls_handler(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let product_id =
        ProductId::new(query_param(query.as_deref(), PRODUCT_ID_PARAM).unwrap_or_default())?;

    // Dropped together with the request future when the client goes away.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    match state.aggregator.payment_urls(&cancel, &product_id).await {
        Ok(urls) => {
            tracing::info!(product_id = %product_id, "payment urls resolved");
            let body = PaymentUrlsResponse {
                google_pay_url: urls.google_pay().to_string(),
                apple_pay_url: urls.apple_pay().to_string(),
            };
            Ok(json_response(StatusCode::OK, &body))
        }
        Err(AggregateError::Provider { source, .. }) => {
            tracing::warn!(
                product_id = %product_id,
                provider = %source.provider(),
                "provider unavailable, serving app store urls"
            );
            Ok(json_response(StatusCode::OK, &AppUrlsResponse::default()))
        }
        Err(err) => Err(ApiError::Unexpected(err.to_string())),
    }
}

/// JSON response with `status`. The status is already decided when the
/// body is encoded, so an encoding failure is only logged.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response body");
            status.into_response()
        }
    }
}
