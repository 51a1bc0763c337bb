use {
    clap::Parser,
    pay_gateway::{
        AppState,
        adapters::{
            apple_pay::{self, ApplePay},
            google_pay::{self, GooglePay},
            transport::HttpClient,
            upstream_mock,
        },
        config::{Config, LogFormat},
        services::aggregator::PaymentUrlAggregator,
    },
    std::sync::Arc,
    tokio::signal,
    tracing_subscriber::EnvFilter,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_tracing(config.log_format);

    let transport = config.transport().expect("failed to load transport config");
    let client = HttpClient::new(&transport).expect("failed to build upstream client");

    let (google_pay_url, apple_pay_url) = if config.mock_providers {
        let google = upstream_mock::spawn(google_pay::mock::router())
            .await
            .expect("failed to start google pay mock");
        let apple = upstream_mock::spawn(apple_pay::mock::router())
            .await
            .expect("failed to start apple pay mock");
        (google, apple)
    } else {
        (
            config.google_pay_url.clone().expect("GOOGLE_PAY_URL must be set"),
            config.apple_pay_url.clone().expect("APPLE_PAY_URL must be set"),
        )
    };

    let aggregator = PaymentUrlAggregator::new(
        Arc::new(GooglePay::new(client.clone(), google_pay_url)),
        Arc::new(ApplePay::new(client, apple_pay_url)),
    );
    let app = pay_gateway::router(AppState {
        aggregator: Arc::new(aggregator),
    });

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
    tracing::info!("server shutdown completed");
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
