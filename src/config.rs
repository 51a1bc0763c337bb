use {
    crate::adapters::transport::TransportConfig,
    clap::{Parser, ValueEnum},
    std::{path::PathBuf, time::Duration},
    thiserror::Error,
    url::Url,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Text,
}

/// Flags, each with an environment fallback (`.env` is honoured).
#[derive(Debug, Clone, Parser)]
#[command(name = "pay_gateway", about = "Payment URL aggregation gateway")]
pub struct Config {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 80)]
    pub port: u16,

    #[arg(long, env = "GOOGLE_PAY_URL", required_unless_present = "mock_providers")]
    pub google_pay_url: Option<Url>,

    #[arg(long, env = "APPLE_PAY_URL", required_unless_present = "mock_providers")]
    pub apple_pay_url: Option<Url>,

    /// Serve both providers from in-process mocks on loopback ports.
    #[arg(long, env = "MOCK_PROVIDERS")]
    pub mock_providers: bool,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 5)]
    pub upstream_timeout_secs: u64,

    /// PEM file with the CA the upstreams' certificates are signed by.
    #[arg(long, env = "UPSTREAM_CA_CERT")]
    pub upstream_ca_cert: Option<PathBuf>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read CA certificate {}: {source}", path.display())]
    CaCert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn transport(&self) -> Result<TransportConfig, ConfigError> {
        let mut transport =
            TransportConfig::with_timeout(Duration::from_secs(self.upstream_timeout_secs));

        if let Some(path) = &self.upstream_ca_cert {
            let pem = std::fs::read(path).map_err(|source| ConfigError::CaCert {
                path: path.clone(),
                source,
            })?;
            transport.pinned_ca_pem = Some(pem);
        }

        Ok(transport)
    }
}
