use {
    super::error::ProviderError,
    super::id::ProductId,
    derive_more::Display,
    std::{future::Future, pin::Pin},
    tokio_util::sync::CancellationToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ProviderName {
    #[display("googlePay")]
    GooglePay,
    #[display("applePay")]
    ApplePay,
}

/// An upstream that can hand out a payment URL for a product.
///
/// Implementations make exactly one upstream call per invocation and must
/// give up as soon as `cancel` fires.
pub trait PaymentProvider: Send + Sync {
    fn pay_url(
        &self,
        cancel: &CancellationToken,
        product_id: &ProductId,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + '_>>;
}
