use {
    super::{GooglePayError, GooglePayResponse},
    crate::adapters::{PRODUCT_ID_PARAM, query_param},
    axum::{
        Json, Router,
        extract::RawQuery,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
};

/// Stand-in for the Google Pay upstream, served on any path.
///
/// `badApple` fails with 500 so the degraded path can be driven end to end.
pub fn router() -> Router {
    Router::new().fallback(pay_button)
}

async fn pay_button(RawQuery(query): RawQuery) -> Response {
    let product_id = query_param(query.as_deref(), PRODUCT_ID_PARAM).unwrap_or_default();

    match product_id.as_str() {
        "" => (
            StatusCode::BAD_REQUEST,
            Json(GooglePayError {
                error: "orderID query params is missing".into(),
            }),
        )
            .into_response(),
        "badApple" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GooglePayError {
                error: "bad apple product".into(),
            }),
        )
            .into_response(),
        _ => Json(GooglePayResponse {
            pay_button_url: format!("http://google.pay.com/payfor?product={product_id}"),
        })
        .into_response(),
    }
}
