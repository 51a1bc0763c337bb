#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header::HOST};
use pay_gateway::AppState;
use pay_gateway::adapters::apple_pay::{self, ApplePay};
use pay_gateway::adapters::google_pay::{self, GooglePay};
use pay_gateway::adapters::transport::{HttpClient, TransportConfig};
use pay_gateway::adapters::upstream_mock;
use pay_gateway::domain::error::{ProviderError, TransportError};
use pay_gateway::domain::id::ProductId;
use pay_gateway::domain::provider::{PaymentProvider, ProviderName};
use pay_gateway::services::aggregator::PaymentUrlAggregator;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use url::Url;

type PayUrlFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

pub const SERVER_HOST: &str = "gateway.test";

// ── Fake providers ─────────────────────────────────────────────────────────

/// Answers `<prefix><product_id>` and counts its calls.
pub struct EchoProvider {
    name: ProviderName,
    prefix: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl EchoProvider {
    pub fn new(name: ProviderName, prefix: &str) -> Arc<Self> {
        Self::delayed(name, prefix, Duration::ZERO)
    }

    pub fn delayed(name: ProviderName, prefix: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            prefix: prefix.to_string(),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentProvider for EchoProvider {
    fn pay_url(&self, cancel: &CancellationToken, product_id: &ProductId) -> PayUrlFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let cancel = cancel.clone();
        let url = format!("{}{}", self.prefix, product_id);
        Box::pin(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ProviderError::Internal {
                    provider: self.name,
                    source: TransportError::Cancelled,
                }),
                _ = tokio::time::sleep(self.delay) => Ok(url),
            }
        })
    }
}

/// Always answers with a non-OK status.
pub struct FailingProvider {
    name: ProviderName,
    status: StatusCode,
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn new(name: ProviderName, status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            name,
            status,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentProvider for FailingProvider {
    fn pay_url(&self, _cancel: &CancellationToken, _product_id: &ProductId) -> PayUrlFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            Err(ProviderError::NotOk {
                provider: self.name,
                status: self.status,
                message: Some("provider says no".into()),
            })
        })
    }
}

/// Never answers on its own; records whether it was told to stop.
pub struct StalledProvider {
    name: ProviderName,
    cancelled: AtomicBool,
}

impl StalledProvider {
    pub fn new(name: ProviderName) -> Arc<Self> {
        Arc::new(Self {
            name,
            cancelled: AtomicBool::new(false),
        })
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl PaymentProvider for StalledProvider {
    fn pay_url(&self, cancel: &CancellationToken, _product_id: &ProductId) -> PayUrlFuture<'_> {
        let cancel = cancel.clone();
        Box::pin(async move {
            cancel.cancelled().await;
            self.cancelled.store(true, Ordering::SeqCst);
            Err(ProviderError::Internal {
                provider: self.name,
                source: TransportError::Cancelled,
            })
        })
    }
}

pub struct PanickingProvider;

impl PaymentProvider for PanickingProvider {
    fn pay_url(&self, _cancel: &CancellationToken, _product_id: &ProductId) -> PayUrlFuture<'_> {
        Box::pin(async move { explode() })
    }
}

fn explode() -> Result<String, ProviderError> {
    panic!("provider exploded")
}

// ── Wiring helpers ─────────────────────────────────────────────────────────

pub fn aggregator(
    google_pay: Arc<dyn PaymentProvider>,
    apple_pay: Arc<dyn PaymentProvider>,
) -> PaymentUrlAggregator {
    PaymentUrlAggregator::new(google_pay, apple_pay)
}

pub fn app(google_pay: Arc<dyn PaymentProvider>, apple_pay: Arc<dyn PaymentProvider>) -> Router {
    pay_gateway::router(AppState {
        aggregator: Arc::new(aggregator(google_pay, apple_pay)),
    })
}

pub fn client() -> HttpClient {
    HttpClient::new(&TransportConfig::with_timeout(Duration::from_secs(5)))
        .expect("build http client")
}

/// Both mock upstreams on loopback: (google pay, apple pay).
pub async fn mock_upstreams() -> (Url, Url) {
    let google = upstream_mock::spawn(google_pay::mock::router())
        .await
        .expect("spawn google pay mock");
    let apple = upstream_mock::spawn(apple_pay::mock::router())
        .await
        .expect("spawn apple pay mock");
    (google, apple)
}

pub fn adapters(
    google_pay_url: Url,
    apple_pay_url: Url,
) -> (Arc<dyn PaymentProvider>, Arc<dyn PaymentProvider>) {
    let client = client();
    (
        Arc::new(GooglePay::new(client.clone(), google_pay_url)),
        Arc::new(ApplePay::new(client, apple_pay_url)),
    )
}

/// A loopback URL nothing listens on.
pub async fn unreachable_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("url")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

pub async fn send(app: &Router, method: Method, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, SERVER_HOST)
        .body(Body::empty())
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri).await
}
