use {
    super::{ApplePayError, ApplePayResponse},
    crate::adapters::{PRODUCT_ID_PARAM, query_param},
    axum::{
        Json, Router,
        extract::RawQuery,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
};

/// Stand-in for the Apple Pay upstream, served on any path.
///
/// `badGoogle` fails with 500.
pub fn router() -> Router {
    Router::new().fallback(pay_button)
}

async fn pay_button(RawQuery(query): RawQuery) -> Response {
    let product_id = query_param(query.as_deref(), PRODUCT_ID_PARAM).unwrap_or_default();

    if product_id.is_empty() {
        let body = ApplePayError {
            error: "orderID query params is missing".into(),
        };
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    if product_id == "badGoogle" {
        let body = ApplePayError {
            error: "bad google product".into(),
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }

    Json(ApplePayResponse {
        pay_button_url: format!("http://apple.pay.com/payfor?product={product_id}"),
    })
    .into_response()
}
