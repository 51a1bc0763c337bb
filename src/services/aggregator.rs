use {
    crate::domain::{
        error::{AggregateError, ProviderError},
        id::ProductId,
        payment::PaymentUrls,
        provider::{PaymentProvider, ProviderName},
    },
    std::sync::Arc,
    tokio::task::JoinSet,
    tokio_util::sync::CancellationToken,
};

/// Fans a product out to both providers and joins the answers.
pub struct PaymentUrlAggregator {
    google_pay: Arc<dyn PaymentProvider>,
    apple_pay: Arc<dyn PaymentProvider>,
}

impl PaymentUrlAggregator {
    pub fn new(google_pay: Arc<dyn PaymentProvider>, apple_pay: Arc<dyn PaymentProvider>) -> Self {
        Self {
            google_pay,
            apple_pay,
        }
    }

    /// Both URLs, or the first provider error observed.
    ///
    /// The first failure cancels the sibling call and its result is dropped
    /// whatever it was. Cancelling `cancel` reaches both calls.
    pub async fn payment_urls(
        &self,
        cancel: &CancellationToken,
        product_id: &ProductId,
    ) -> Result<PaymentUrls, AggregateError> {
        let group = cancel.child_token();
        // fires on every exit path, including the caller dropping this future
        let _cancel_siblings = group.clone().drop_guard();

        let mut tasks = JoinSet::new();
        for (slot, provider) in [
            (ProviderName::GooglePay, &self.google_pay),
            (ProviderName::ApplePay, &self.apple_pay),
        ] {
            let provider = Arc::clone(provider);
            let token = group.clone();
            let product_id = product_id.clone();
            tasks.spawn(async move { (slot, provider.pay_url(&token, &product_id).await) });
        }

        let mut google_pay = None;
        let mut apple_pay = None;

        while let Some(joined) = tasks.join_next().await {
            let (slot, result) = joined.map_err(|e| {
                tracing::error!(product_id = %product_id, error = %e, "provider task died");
                AggregateError::Task(e.to_string())
            })?;

            match result {
                Ok(url) => match slot {
                    ProviderName::GooglePay => google_pay = Some(url),
                    ProviderName::ApplePay => apple_pay = Some(url),
                },
                Err(source) => return Err(first_failure(product_id, source)),
            }
        }

        match (google_pay, apple_pay) {
            (Some(google_pay), Some(apple_pay)) => Ok(PaymentUrls::new(google_pay, apple_pay)),
            _ => Err(AggregateError::Task(
                "provider task finished without a result".into(),
            )),
        }
    }
}

fn first_failure(product_id: &ProductId, source: ProviderError) -> AggregateError {
    tracing::warn!(
        product_id = %product_id,
        provider = %source.provider(),
        error = %source,
        "provider failed, cancelling sibling"
    );
    AggregateError::Provider {
        product_id: product_id.clone(),
        source,
    }
}
