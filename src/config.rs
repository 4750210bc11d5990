//! Theme configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_URL` - Base URL of the storefront (e.g., <https://shop.example.com>)
//!
//! ## Optional
//! - `CART_ADD_URL` - Cart add endpoint (default: `{SHOP_URL}/cart/add.js`)
//! - `CART_ADDING_LABEL` - Submit button label while the request is in flight
//! - `CART_ADDED_LABEL` - Submit button label after a successful add
//! - `CART_ADD_ERROR_TEXT` - Alert text shown when the add fails

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// How long the "added" button label is shown before reverting.
const ADDED_LABEL_WINDOW: Duration = Duration::from_secs(2);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Theme runtime configuration.
///
/// Injected at controller construction; nothing in the runtime reads
/// ambient globals.
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Base URL of the storefront; the cart snapshot lives at
    /// `{shop_base_url}/cart.js`.
    pub shop_base_url: Url,
    /// Cart add endpoint (form-encoded POST target).
    pub cart_add_url: Url,
    /// Localized UI copy for the add-to-cart flow.
    pub strings: UiStrings,
    /// How long the "added" label stays on the button.
    pub revert_delay: Duration,
}

/// Localized UI strings for the add-to-cart flow.
///
/// Defaults carry the storefront's shipped Spanish copy.
#[derive(Debug, Clone)]
pub struct UiStrings {
    /// Button label while the add request is in flight.
    pub adding: String,
    /// Button label after a successful add.
    pub added: String,
    /// Alert text when the add fails.
    pub add_error: String,
}

impl Default for UiStrings {
    fn default() -> Self {
        Self {
            adding: "Agregando...".to_string(),
            added: "\u{2713} Agregado".to_string(),
            add_error: "Error al agregar al carrito".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Build a configuration from a shop base URL, deriving the cart add
    /// endpoint and using default UI strings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn new(shop_base_url: &str) -> Result<Self, ConfigError> {
        let base = parse_url("SHOP_URL", shop_base_url)?;
        let cart_add_url = join_path(&base, "cart/add.js")
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_URL".to_string(), e.to_string()))?;

        Ok(Self {
            shop_base_url: base,
            cart_add_url,
            strings: UiStrings::default(),
            revert_delay: ADDED_LABEL_WINDOW,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::new(&get_required_env("SHOP_URL")?)?;

        if let Some(raw) = get_optional_env("CART_ADD_URL") {
            config.cart_add_url = parse_url("CART_ADD_URL", &raw)?;
        }
        if let Some(label) = get_optional_env("CART_ADDING_LABEL") {
            config.strings.adding = label;
        }
        if let Some(label) = get_optional_env("CART_ADDED_LABEL") {
            config.strings.added = label;
        }
        if let Some(text) = get_optional_env("CART_ADD_ERROR_TEXT") {
            config.strings.add_error = text;
        }

        Ok(config)
    }

    /// The cart snapshot endpoint, `{shop_base_url}/cart.js`.
    #[must_use]
    pub fn cart_url(&self) -> String {
        format!(
            "{}/cart.js",
            self.shop_base_url.as_str().trim_end_matches('/')
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse a URL, attributing failures to the named variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Append a path to a base URL without `Url::join`'s last-segment
/// replacement semantics.
fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}/{path}", base.as_str().trim_end_matches('/')))
}
