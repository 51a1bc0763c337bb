pub mod mock;

use {
    super::{product_url, transport::HttpClient},
    crate::domain::{
        error::ProviderError,
        id::ProductId,
        provider::{PaymentProvider, ProviderName},
    },
    reqwest::StatusCode,
    serde::{Deserialize, Serialize},
    std::{future::Future, pin::Pin},
    tokio_util::sync::CancellationToken,
    url::Url,
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ApplePayResponse {
    #[serde(rename = "some_url")]
    pay_button_url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ApplePayError {
    #[serde(rename = "a_err")]
    error: String,
}

pub struct ApplePay {
    client: HttpClient,
    base_url: Url,
}

impl ApplePay {
    pub fn new(client: HttpClient, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn pay_url_inner(
        &self,
        cancel: &CancellationToken,
        product_id: &ProductId,
    ) -> Result<String, ProviderError> {
        let url = product_url(&self.base_url, product_id);
        let mut response = ApplePayResponse::default();
        let mut error = ApplePayError::default();

        let status = self
            .client
            .get(cancel, Some(&url), Some(&mut response), Some(&mut error))
            .await
            .map_err(|source| ProviderError::Internal {
                provider: ProviderName::ApplePay,
                source,
            })?;

        if status != StatusCode::OK {
            tracing::warn!(
                provider = %ProviderName::ApplePay,
                status = status.as_u16(),
                upstream_error = %error.error,
                "upstream refused payment url"
            );
            return Err(ProviderError::NotOk {
                provider: ProviderName::ApplePay,
                status,
                message: Some(error.error).filter(|m| !m.is_empty()),
            });
        }

        Ok(response.pay_button_url)
    }
}

impl PaymentProvider for ApplePay {
    fn pay_url(
        &self,
        cancel: &CancellationToken,
        product_id: &ProductId,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + '_>> {
        let cancel = cancel.clone();
        let product_id = product_id.clone();
        Box::pin(async move { self.pay_url_inner(&cancel, &product_id).await })
    }
}
