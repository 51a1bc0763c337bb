/// Store listing users are sent to when a provider cannot be reached.
pub const APPLE_APP_URL: &str = "http://apple.store.com/myApp";
pub const GOOGLE_APP_URL: &str = "http://google.store.com/myApp";

/// Payment URLs from both providers. Only built when both calls succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUrls {
    google_pay: String,
    apple_pay: String,
}

impl PaymentUrls {
    pub fn new(google_pay: String, apple_pay: String) -> Self {
        Self {
            google_pay,
            apple_pay,
        }
    }

    pub fn google_pay(&self) -> &str {
        &self.google_pay
    }

    pub fn apple_pay(&self) -> &str {
        &self.apple_pay
    }
}
