//! Storefront theme runtime - demo driver.
//!
//! Builds a sample storefront page, wires the theme controller with a
//! file-backed preference store, and runs a short scripted session:
//! initial theme application, a scroll past the navbar threshold, a theme
//! toggle, and an add-to-cart attempt against the configured endpoints.
//!
//! Point `SHOP_URL` at a live storefront to see the cart flows succeed;
//! against an unreachable endpoint the failure paths are exercised and
//! logged instead.

use std::time::Duration;

use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_theme::config::ThemeConfig;
use storefront_theme::controller::{LogAlert, ThemeController};
use storefront_theme::debounce::Debouncer;
use storefront_theme::forms::FormData;
use storefront_theme::page::{Element, Page};
use storefront_theme::prefs::FileStore;

/// Default location of the preference file, next to the process.
const PREFS_FILE: &str = "theme-prefs.json";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info for our crate
    // if RUST_LOG is not set.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_theme=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ThemeConfig::from_env().expect("Failed to load configuration");
    tracing::info!(shop = %config.shop_base_url, "Theme runtime starting");

    let prefs_path =
        std::env::var("THEME_PREFS_PATH").unwrap_or_else(|_| PREFS_FILE.to_string());
    let store = FileStore::new(prefs_path);

    let mut page = build_sample_page();
    let mut controller =
        ThemeController::new(config, &page, Box::new(store), Box::new(LogAlert));

    // Startup: persisted theme, cart count, initial offset.
    controller.init(&mut page, 0.0).await;
    tracing::info!(state = ?controller.state(), "Initialized");

    // A burst of scroll events, debounced down to the last offset.
    let mut scroll_debounce: Debouncer<f64> = Debouncer::new(Duration::from_millis(100));
    for offset in [4.0, 9.0, 24.0] {
        scroll_debounce.call(offset, Instant::now());
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    if let Some(offset) = scroll_debounce.poll(Instant::now()) {
        controller.handle_scroll(&mut page, offset);
    }
    tracing::info!(state = ?controller.state(), "Scrolled down");
    controller.handle_scroll(&mut page, 0.0);

    // Toggle dark mode on (persisted for the next run).
    controller.toggle_theme(&mut page);
    tracing::info!(state = ?controller.state(), "Theme toggled");

    // Submit the demo add-to-cart form and let the label revert.
    let form = controller.registry().add_to_cart_forms.first().copied();
    if let Some(form) = form {
        controller.handle_submit(&mut page, form, Instant::now()).await;
        if let Some(due) = controller.next_revert_due() {
            tokio::time::sleep_until(due).await;
            controller.flush_reverts(&mut page, Instant::now());
        }
    }

    tracing::info!("Session complete");
}

/// A small storefront page: header with navbar, theme toggle, cart badge,
/// and one add-to-cart form.
fn build_sample_page() -> Page {
    let mut page = Page::new();
    let root = page.root();

    let header = page.append(root, Element::new("header").with_class("site-header"));
    let navbar = page.append(header, Element::new("nav").with_attr("data-navbar", ""));
    page.append(
        navbar,
        Element::new("span").with_class("logo-text").with_text("Tienda"),
    );
    page.append(
        navbar,
        Element::new("a").with_class("nav-link").with_attr("href", "/collections/all"),
    );
    let toggle = page.append(
        navbar,
        Element::new("button")
            .with_class("btn-icon")
            .with_attr("data-theme-toggle", ""),
    );
    page.append(toggle, Element::new("svg").with_class("sun-icon"));
    page.append(toggle, Element::new("svg").with_class("moon-icon"));
    page.append(navbar, Element::new("span").with_attr("data-cart-count", ""));

    let main = page.append(root, Element::new("main"));
    let fields: FormData = [("id", "44632389492949"), ("quantity", "1")]
        .into_iter()
        .collect();
    let form = page.append(
        main,
        Element::new("form")
            .with_class("add-to-cart-form")
            .with_fields(fields),
    );
    page.append(
        form,
        Element::new("button")
            .with_attr("type", "submit")
            .with_text("Agregar al carrito"),
    );

    page
}
