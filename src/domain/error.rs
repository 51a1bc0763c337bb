use {
    super::{id::ProductId, provider::ProviderName},
    reqwest::StatusCode,
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("orderID query params is missing")]
    MissingProductId,
}

/// Failure of a single upstream exchange, before any provider semantics
/// are applied.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("url shouldn't be empty")]
    MissingUrl,

    #[error("request cancelled")]
    Cancelled,

    #[error("request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("decode response body (status {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error("client setup: {0}")]
    Setup(#[source] reqwest::Error),
}

impl TransportError {
    /// Upstream status, when the exchange got far enough to see one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Decode { status, .. } => Some(*status),
            Self::Request(err) => err.status(),
            Self::MissingUrl | Self::Cancelled | Self::Setup(_) => None,
        }
    }
}

/// The only error kinds a provider adapter is allowed to return.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("internal provider error: {provider} err: {source}")]
    Internal {
        provider: ProviderName,
        #[source]
        source: TransportError,
    },

    #[error("status code not OK: {provider} status code: {status}")]
    NotOk {
        provider: ProviderName,
        status: StatusCode,
        message: Option<String>,
    },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderName {
        match self {
            Self::Internal { provider, .. } | Self::NotOk { provider, .. } => *provider,
        }
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("payment urls for {product_id}: {source}")]
    Provider {
        product_id: ProductId,
        #[source]
        source: ProviderError,
    },

    #[error("provider task: {0}")]
    Task(String),
}
