use {
    axum::Router,
    std::io,
    tokio::net::TcpListener,
    url::Url,
};

/// Serves `router` on an ephemeral loopback port for the lifetime of the
/// runtime and returns its base URL.
pub async fn spawn(router: Router) -> io::Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "mock upstream stopped");
        }
    });

    tracing::info!(%addr, "mock upstream listening");
    Url::parse(&format!("http://{addr}/")).map_err(io::Error::other)
}
