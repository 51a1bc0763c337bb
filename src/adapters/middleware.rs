//! Layers wrapped around every route, outermost first: server name, panic
//! isolation, request logging, response timing.
//!
//! The server name sits outside panic isolation so recovered 500s carry it
//! too.

use {
    super::api_errors::ApiError,
    axum::{
        Router,
        extract::Request,
        http::{HeaderMap, HeaderName, HeaderValue, header::HOST},
        middleware::{self, Next},
        response::{IntoResponse, Response},
    },
    std::{any::Any, time::Instant},
    tower::ServiceBuilder,
    tower_http::catch_panic::CatchPanicLayer,
    tracing::Instrument,
    uuid::Uuid,
};

pub const SERVER_NAME: HeaderName = HeaderName::from_static("x-server-name");
pub const RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(server_name))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(log_request))
            .layer(middleware::from_fn(response_time)),
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %details, "panic recovery");
    ApiError::Panic(details).into_response()
}

async fn log_request(request: Request, next: Next) -> Response {
    let request_id = Uuid::now_v7();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let span = tracing::info_span!("request", %request_id, %method, %path);

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            elapsed = ?start.elapsed(),
            "{method} {path}"
        )
    });
    response
}

async fn server_name(request: Request, next: Next) -> Response {
    let name = host(&request);
    let mut response = next.run(request).await;
    if let Some(name) = name {
        response.headers_mut().insert(SERVER_NAME, name);
    }
    response
}

fn host(request: &Request) -> Option<HeaderValue> {
    request.headers().get(HOST).cloned().or_else(|| {
        request
            .uri()
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
    })
}

async fn response_time(request: Request, next: Next) -> Response {
    let mut timer = ResponseTimer::start();
    let mut response = next.run(request).await;
    timer.send_head(response.headers_mut());
    response
}

/// Stamps the response head with the time spent since the request came in.
///
/// The head goes out once: only the first `send_head` writes anything, so
/// the timing reflects the first byte sent.
#[derive(Debug)]
pub struct ResponseTimer {
    start: Instant,
    head_sent: bool,
}

impl ResponseTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            head_sent: false,
        }
    }

    /// Returns `false` when the head had already been stamped.
    pub fn send_head(&mut self, headers: &mut HeaderMap) -> bool {
        if self.head_sent {
            return false;
        }

        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        headers.insert(RESPONSE_TIME, HeaderValue::from(micros));

        self.head_sent = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn head_is_stamped_once() {
        let mut timer = ResponseTimer::start();
        let mut headers = HeaderMap::new();

        assert!(timer.send_head(&mut headers));
        let first = headers[RESPONSE_TIME].clone();

        std::thread::sleep(Duration::from_millis(2));
        let mut again = headers.clone();
        assert!(!timer.send_head(&mut again));

        assert_eq!(again[RESPONSE_TIME], first);
        assert!(first.to_str().unwrap().parse::<u64>().is_ok());
    }

    #[test]
    fn panic_payloads_become_500() {
        let response = panic_response(Box::new("static message"));
        assert_eq!(response.status(), 500);

        let response = panic_response(Box::new(String::from("owned message")));
        assert_eq!(response.status(), 500);

        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), 500);
    }
}
