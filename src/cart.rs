//! Cart endpoint client.
//!
//! Talks to the storefront's AJAX cart endpoints: `GET {shop}/cart.js` for
//! the current snapshot and a form-encoded `POST` to the cart-add URL.
//! Snapshots are ephemeral — nothing here is cached, and there are no
//! retries; a failure is terminal for the triggering action.

use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use crate::config::ThemeConfig;
use crate::error::{Result, ThemeError};
use crate::forms::FormData;

/// The cart summary returned by the storefront.
///
/// Only `item_count` is consumed by the theme layer; the remainder of the
/// payload is carried untyped.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSnapshot {
    /// Total number of items in the cart.
    pub item_count: i64,
    /// The rest of the snapshot, as returned.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Client for the storefront cart endpoints.
///
/// Cheaply cloneable; endpoint URLs are computed once at construction.
#[derive(Clone)]
pub struct CartClient {
    inner: Arc<CartClientInner>,
}

struct CartClientInner {
    http: reqwest::Client,
    cart_url: String,
    cart_add_url: String,
}

impl CartClient {
    /// Create a client from the theme configuration.
    #[must_use]
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            inner: Arc::new(CartClientInner {
                http: reqwest::Client::new(),
                cart_url: config.cart_url(),
                cart_add_url: config.cart_add_url.to_string(),
            }),
        }
    }

    /// Fetch the current cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable body.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<CartSnapshot> {
        let text = self.request_text(self.inner.http.get(&self.inner.cart_url)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Add an item to the cart from serialized form fields.
    ///
    /// The response shape is not validated beyond being JSON; the caller
    /// re-fetches the snapshot for anything it needs.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable body.
    #[instrument(skip(self, form))]
    pub async fn add_to_cart(&self, form: &FormData) -> Result<serde_json::Value> {
        let request = self.inner.http.post(&self.inner.cart_add_url).form(form.pairs());
        let text = self.request_text(request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send a request and return the body text, treating non-success
    /// statuses as errors. The body is read as text first so parse
    /// failures can be logged with what actually came back.
    async fn request_text(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(200).collect::<String>(),
                "Cart endpoint returned non-success status"
            );
            return Err(ThemeError::Status(status));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keeps_unknown_fields() {
        let snapshot: CartSnapshot = serde_json::from_str(
            r#"{"item_count": 3, "total_price": 4200, "currency": "MXN"}"#,
        )
        .expect("valid snapshot");
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(snapshot.rest["total_price"], 4200);
        assert_eq!(snapshot.rest["currency"], "MXN");
    }

    #[test]
    fn test_snapshot_requires_item_count() {
        let result: std::result::Result<CartSnapshot, _> =
            serde_json::from_str(r#"{"total_price": 4200}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoints_derived_from_config() {
        let config = ThemeConfig::new("https://shop.example.com").expect("valid config");
        let client = CartClient::new(&config);
        assert_eq!(client.inner.cart_url, "https://shop.example.com/cart.js");
        assert_eq!(
            client.inner.cart_add_url,
            "https://shop.example.com/cart/add.js"
        );
    }
}
