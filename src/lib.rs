pub mod adapters;
pub mod config;
pub mod domain;
pub mod services;

use {
    axum::{
        Router,
        routing::{any, get},
    },
    services::aggregator::PaymentUrlAggregator,
    std::sync::Arc,
};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<PaymentUrlAggregator>,
}

/// Full HTTP surface of the gateway, middleware included.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/api/v1/payments/urls",
            any(adapters::api::payment_urls_handler),
        )
        .with_state(state);

    adapters::middleware::apply(routes)
}
