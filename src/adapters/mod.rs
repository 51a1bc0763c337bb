pub mod api;
pub mod api_errors;
pub mod apple_pay;
pub mod google_pay;
pub mod middleware;
pub mod transport;
pub mod upstream_mock;

use {crate::domain::id::ProductId, url::Url};

pub const PRODUCT_ID_PARAM: &str = "productID";

/// Copy of `base` with `productID` set to `product_id`. Other query pairs
/// are kept, a previous `productID` is replaced.
pub(crate) fn product_url(base: &Url, product_id: &ProductId) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| *key != PRODUCT_ID_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(PRODUCT_ID_PARAM, product_id.as_str());
    url
}

/// First value of `key` in a raw query string.
pub(crate) fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.into_owned())
}
