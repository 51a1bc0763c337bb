use {
    crate::domain::error::TransportError,
    reqwest::{Certificate, Client, StatusCode, header::HeaderMap},
    serde::de::DeserializeOwned,
    std::time::Duration,
    tokio_util::sync::CancellationToken,
    url::Url,
};

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Budget for the whole exchange, independent of the caller's token.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// PEM bundle of the only CA the client trusts.
    pub pinned_ca_pem: Option<Vec<u8>>,
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            pinned_ca_pem: None,
        }
    }
}

/// GET-only client for the payment upstreams.
///
/// Cloning is cheap and clones share nothing per call, so one instance is
/// handed to every adapter.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Upstreams sit behind a private CA and are addressed by IP, so the
    /// public roots are dropped and hostname checks are skipped.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .pool_max_idle_per_host(0)
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .tls_built_in_root_certs(false)
            .danger_accept_invalid_hostnames(true);

        if let Some(pem) = &config.pinned_ca_pem {
            let ca = Certificate::from_pem(pem).map_err(TransportError::Setup)?;
            builder = builder.add_root_certificate(ca);
        }

        let client = builder.build().map_err(TransportError::Setup)?;
        Ok(Self { client })
    }

    pub async fn get<S, E>(
        &self,
        cancel: &CancellationToken,
        url: Option<&Url>,
        success: Option<&mut S>,
        error: Option<&mut E>,
    ) -> Result<StatusCode, TransportError>
    where
        S: DeserializeOwned,
        E: DeserializeOwned,
    {
        self.get_with_headers(cancel, url, success, error, None).await
    }

    /// Issues one GET and decodes the body into `error` for statuses >= 300
    /// (when given), otherwise into `success` (when given).
    ///
    /// A body that fails to decode is reported together with the status.
    /// With no targets the status is returned and the body is discarded.
    pub async fn get_with_headers<S, E>(
        &self,
        cancel: &CancellationToken,
        url: Option<&Url>,
        success: Option<&mut S>,
        error: Option<&mut E>,
        headers: Option<HeaderMap>,
    ) -> Result<StatusCode, TransportError>
    where
        S: DeserializeOwned,
        E: DeserializeOwned,
    {
        let url = url.ok_or(TransportError::MissingUrl)?;

        let mut request = self.client.get(url.as_str());
        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        tracing::debug!(url = %url, "sending upstream request");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, TransportError>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = exchange => result?,
        };

        tracing::debug!(url = %url, status = status.as_u16(), "upstream responded");

        decode_body(status, &body, success, error)
    }
}

fn decode_body<S, E>(
    status: StatusCode,
    body: &[u8],
    success: Option<&mut S>,
    error: Option<&mut E>,
) -> Result<StatusCode, TransportError>
where
    S: DeserializeOwned,
    E: DeserializeOwned,
{
    let decode_failed = move |source| TransportError::Decode { status, source };

    match (error, success) {
        (Some(target), _) if status >= StatusCode::MULTIPLE_CHOICES => {
            *target = serde_json::from_slice(body).map_err(decode_failed)?;
        }
        (_, Some(target)) => {
            *target = serde_json::from_slice(body).map_err(decode_failed)?;
        }
        _ => {}
    }

    Ok(status)
}
