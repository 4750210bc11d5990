//! Theme controller.
//!
//! Owns the theme/navbar state and drives every mutation of the page the
//! theme layer performs: dark-mode toggling with persistence, the
//! scroll-driven navbar treatment, add-to-cart submission, and cart-count
//! refresh. A host loop feeds it events (scroll offsets, toggle clicks,
//! form submits, section reloads, clock ticks); the controller never reads
//! ambient state.

use tokio::time::Instant;
use tracing::{debug, error, instrument, warn};

use crate::cart::CartClient;
use crate::config::ThemeConfig;
use crate::page::{NodeId, Page};
use crate::prefs::{PreferenceStore, ThemeMode};

/// Scroll offset (px) past which the navbar gets its scrolled treatment.
const SCROLL_THRESHOLD_PX: f64 = 10.0;

/// Class applied to the document root in dark mode.
const DARK_CLASS: &str = "dark";

/// Class applied to the site header once scrolled.
const SCROLLED_CLASS: &str = "scrolled";

/// Marker class for forms whose submit the controller intercepts.
const ADD_TO_CART_FORM_CLASS: &str = "add-to-cart-form";

/// Hover treatment shared by navbar text elements.
const NAV_HOVER_CLASS: &str = "hover:text-red-500";

/// Sink for blocking user-facing alerts.
pub trait AlertSink {
    /// Surface a blocking alert to the user.
    fn alert(&mut self, message: &str);
}

/// Default sink for headless hosts: the alert goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlert;

impl AlertSink for LogAlert {
    fn alert(&mut self, message: &str) {
        error!(%message, "User alert");
    }
}

/// The controller's two state flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub is_dark: bool,
    pub is_scrolled: bool,
}

/// Typed references to the page regions the theme layer touches,
/// discovered once instead of re-queried on every update.
#[derive(Debug, Clone, Default)]
pub struct UiRegistry {
    /// `[data-navbar]` container.
    pub navbar: Option<NodeId>,
    /// `.site-header` wrapper that receives the scrolled class.
    pub header: Option<NodeId>,
    /// `.logo-text` inside the navbar.
    pub logo_text: Option<NodeId>,
    /// `.nav-link`s inside the navbar.
    pub nav_links: Vec<NodeId>,
    /// `.btn-icon`s inside the navbar.
    pub btn_icons: Vec<NodeId>,
    /// `[data-theme-toggle]` control.
    pub theme_toggle: Option<NodeId>,
    /// `[data-cart-count]` badges.
    pub cart_badges: Vec<NodeId>,
    /// `.sun-icon`s (shown in dark mode).
    pub sun_icons: Vec<NodeId>,
    /// `.moon-icon`s (shown in light mode).
    pub moon_icons: Vec<NodeId>,
    /// `.add-to-cart-form`s.
    pub add_to_cart_forms: Vec<NodeId>,
}

impl UiRegistry {
    /// Discover the theme layer's page regions.
    #[must_use]
    pub fn discover(page: &Page) -> Self {
        let root = page.root();
        let navbar = page.find_attr(root, "data-navbar");

        Self {
            navbar,
            header: page.find_class(root, "site-header"),
            logo_text: navbar.and_then(|nav| page.find_class(nav, "logo-text")),
            nav_links: navbar.map_or_else(Vec::new, |nav| page.query_class(nav, "nav-link")),
            btn_icons: navbar.map_or_else(Vec::new, |nav| page.query_class(nav, "btn-icon")),
            theme_toggle: page.find_attr(root, "data-theme-toggle"),
            cart_badges: page.query_attr(root, "data-cart-count"),
            sun_icons: page.query_class(root, "sun-icon"),
            moon_icons: page.query_class(root, "moon-icon"),
            add_to_cart_forms: page.query_class(root, ADD_TO_CART_FORM_CLASS),
        }
    }
}

/// What the controller did with a dispatched submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form carried the marker class; default navigation is suppressed.
    Intercepted,
    /// Not an add-to-cart form; the host applies default submission.
    NotHandled,
}

/// A scheduled button-label restoration.
#[derive(Debug)]
struct LabelRevert {
    button: NodeId,
    label: String,
    due: Instant,
}

/// The theme controller.
pub struct ThemeController {
    config: ThemeConfig,
    cart: CartClient,
    store: Box<dyn PreferenceStore>,
    alerts: Box<dyn AlertSink>,
    registry: UiRegistry,
    state: ThemeState,
    pending_reverts: Vec<LabelRevert>,
}

impl ThemeController {
    /// Build a controller for a page.
    ///
    /// The persisted theme preference is read here, once; the registry is
    /// discovered here, once. `init` applies both to the page.
    #[must_use]
    pub fn new(
        config: ThemeConfig,
        page: &Page,
        store: Box<dyn PreferenceStore>,
        alerts: Box<dyn AlertSink>,
    ) -> Self {
        let cart = CartClient::new(&config);
        let registry = UiRegistry::discover(page);
        let is_dark = store.load().unwrap_or_default().is_dark();

        Self {
            config,
            cart,
            store,
            alerts,
            registry,
            state: ThemeState {
                is_dark,
                is_scrolled: false,
            },
            pending_reverts: Vec::new(),
        }
    }

    /// Current state flags.
    #[must_use]
    pub const fn state(&self) -> ThemeState {
        self.state
    }

    /// The discovered page regions.
    #[must_use]
    pub const fn registry(&self) -> &UiRegistry {
        &self.registry
    }

    /// Startup: apply the persisted theme, refresh the cart count, and
    /// evaluate the initial scroll offset.
    pub async fn init(&mut self, page: &mut Page, scroll_offset: f64) {
        self.apply_theme(page);
        self.refresh_cart_count(page).await;
        self.handle_scroll(page, scroll_offset);
    }

    /// Flip the theme, persist it, and re-apply root class, icons, and
    /// navbar colors. A store failure is logged, not fatal.
    pub fn toggle_theme(&mut self, page: &mut Page) {
        self.state.is_dark = !self.state.is_dark;

        let mode = if self.state.is_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        if let Err(e) = self.store.save(mode) {
            warn!(error = %e, "Failed to persist theme preference");
        }

        self.apply_theme(page);
        debug!(mode = mode.as_str(), "Theme toggled");
    }

    /// Evaluate a scroll offset against the threshold. Only a state
    /// transition touches the page, so the header class is written exactly
    /// once per direction change.
    pub fn handle_scroll(&mut self, page: &mut Page, offset: f64) {
        let scrolled = offset > SCROLL_THRESHOLD_PX;
        if scrolled == self.state.is_scrolled {
            return;
        }
        self.state.is_scrolled = scrolled;
        debug!(offset, scrolled, "Scroll state changed");
        self.update_navbar(page);
    }

    /// Dispatch a form submit. Only forms carrying the marker class are
    /// intercepted; for those the flow is: disable the submit button, show
    /// the "adding" label, POST the fields, then either show the "added"
    /// label and schedule its reversion, or roll the button back and raise
    /// one alert.
    pub async fn handle_submit(
        &mut self,
        page: &mut Page,
        form: NodeId,
        now: Instant,
    ) -> SubmitOutcome {
        if !page.get(form).has_class(ADD_TO_CART_FORM_CLASS) {
            return SubmitOutcome::NotHandled;
        }

        let Some(button) = page
            .query_tag(form, "button")
            .into_iter()
            .find(|&b| page.get(b).attr("type") == Some("submit"))
        else {
            warn!("Add-to-cart form has no submit button");
            return SubmitOutcome::Intercepted;
        };

        let fields = page.get(form).fields.clone();
        let original_label = page.get(button).text.clone();

        {
            let b = page.get_mut(button);
            b.disabled = true;
            b.text = self.config.strings.adding.clone();
        }

        match self.cart.add_to_cart(&fields).await {
            Ok(_) => {
                self.refresh_cart_count(page).await;

                let b = page.get_mut(button);
                b.disabled = false;
                b.text = self.config.strings.added.clone();

                self.pending_reverts.push(LabelRevert {
                    button,
                    label: original_label,
                    due: now + self.config.revert_delay,
                });
            }
            Err(e) => {
                error!(error = %e, "Failed to add item to cart");
                let b = page.get_mut(button);
                b.disabled = false;
                b.text = original_label;
                self.alerts.alert(&self.config.strings.add_error);
            }
        }

        SubmitOutcome::Intercepted
    }

    /// Apply label reverts whose window has elapsed. A superseding submit
    /// does not cancel a pending revert.
    pub fn flush_reverts(&mut self, page: &mut Page, now: Instant) {
        let mut i = 0;
        while i < self.pending_reverts.len() {
            if self.pending_reverts[i].due <= now {
                let revert = self.pending_reverts.swap_remove(i);
                page.get_mut(revert.button).text = revert.label;
            } else {
                i += 1;
            }
        }
    }

    /// Earliest pending revert deadline, for hosts that sleep between
    /// events.
    #[must_use]
    pub fn next_revert_due(&self) -> Option<Instant> {
        self.pending_reverts.iter().map(|r| r.due).min()
    }

    /// Fetch the cart snapshot and update every count badge: text is the
    /// item count, and the badge is hidden unless the count is positive.
    /// A fetch failure is logged and leaves the badges untouched.
    #[instrument(skip(self, page))]
    pub async fn refresh_cart_count(&mut self, page: &mut Page) {
        match self.cart.fetch_cart().await {
            Ok(snapshot) => {
                debug!(item_count = snapshot.item_count, "Cart snapshot fetched");
                for &badge in &self.registry.cart_badges {
                    let el = page.get_mut(badge);
                    el.text = snapshot.item_count.to_string();
                    el.hidden = snapshot.item_count <= 0;
                }
            }
            Err(e) => error!(error = %e, "Failed to refresh cart count"),
        }
    }

    /// React to a partial section reload: re-discover the registry (the
    /// reload may have replaced nodes) and re-apply theme and cart count.
    /// Scroll and submit dispatch are bound once by the host and are not
    /// re-bound here.
    pub async fn handle_section_load(&mut self, page: &mut Page) {
        self.registry = UiRegistry::discover(page);
        self.apply_theme(page);
        self.refresh_cart_count(page).await;
    }

    /// Root dark class, theme icons, navbar colors.
    fn apply_theme(&mut self, page: &mut Page) {
        let root = page.root();
        if self.state.is_dark {
            page.get_mut(root).add_class(DARK_CLASS);
        } else {
            page.get_mut(root).remove_class(DARK_CLASS);
        }
        self.update_theme_icons(page);
        self.update_navbar_colors(page);
    }

    /// Dark mode shows the sun icon (tap to go light); light mode shows
    /// the moon.
    fn update_theme_icons(&self, page: &mut Page) {
        for &icon in &self.registry.sun_icons {
            page.get_mut(icon).hidden = !self.state.is_dark;
        }
        for &icon in &self.registry.moon_icons {
            page.get_mut(icon).hidden = self.state.is_dark;
        }
    }

    /// Header scrolled class plus navbar colors. Requires both the navbar
    /// and the header to be present.
    fn update_navbar(&self, page: &mut Page) {
        let (Some(_), Some(header)) = (self.registry.navbar, self.registry.header) else {
            return;
        };

        if self.state.is_scrolled {
            page.get_mut(header).add_class(SCROLLED_CLASS);
        } else {
            page.get_mut(header).remove_class(SCROLLED_CLASS);
        }

        self.update_navbar_colors(page);
    }

    /// Navbar text color: white at the top regardless of theme;
    /// theme-dependent once scrolled. Class lists are overwritten whole.
    fn update_navbar_colors(&self, page: &mut Page) {
        if self.registry.navbar.is_none() {
            return;
        }

        let text_color = if self.state.is_scrolled {
            if self.state.is_dark { "text-white" } else { "text-black" }
        } else {
            "text-white"
        };

        if let Some(logo) = self.registry.logo_text {
            page.get_mut(logo).set_class_list(&format!("logo-text {text_color}"));
        }
        for &link in &self.registry.nav_links {
            page.get_mut(link).set_class_list(&format!(
                "nav-link transition-colors {NAV_HOVER_CLASS} {text_color}"
            ));
        }
        for &btn in &self.registry.btn_icons {
            page.get_mut(btn).set_class_list(&format!(
                "btn-icon transition-colors {NAV_HOVER_CLASS} {text_color}"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Element;
    use crate::prefs::MemoryStore;

    /// Storefront header with navbar, icons, badge, and an add form.
    fn sample_page() -> Page {
        let mut page = Page::new();
        let root = page.root();

        let header = page.append(root, Element::new("header").with_class("site-header"));
        let navbar = page.append(header, Element::new("nav").with_attr("data-navbar", ""));
        page.append(navbar, Element::new("span").with_class("logo-text"));
        page.append(navbar, Element::new("a").with_class("nav-link").with_attr("href", "/"));
        page.append(navbar, Element::new("a").with_class("nav-link").with_attr("href", "/sale"));
        let toggle = page.append(
            navbar,
            Element::new("button")
                .with_class("btn-icon")
                .with_attr("data-theme-toggle", ""),
        );
        page.append(toggle, Element::new("svg").with_class("sun-icon"));
        page.append(toggle, Element::new("svg").with_class("moon-icon"));
        page.append(
            navbar,
            Element::new("span").with_attr("data-cart-count", ""),
        );

        page
    }

    fn controller(page: &Page) -> ThemeController {
        let config = ThemeConfig::new("http://127.0.0.1:9").expect("valid config");
        ThemeController::new(
            config,
            page,
            Box::new(MemoryStore::new()),
            Box::new(LogAlert),
        )
    }

    #[test]
    fn test_registry_discovery() {
        let page = sample_page();
        let registry = UiRegistry::discover(&page);

        assert!(registry.navbar.is_some());
        assert!(registry.header.is_some());
        assert!(registry.logo_text.is_some());
        assert_eq!(registry.nav_links.len(), 2);
        assert_eq!(registry.btn_icons.len(), 1);
        assert!(registry.theme_toggle.is_some());
        assert_eq!(registry.cart_badges.len(), 1);
        assert_eq!(registry.sun_icons.len(), 1);
        assert_eq!(registry.moon_icons.len(), 1);
        assert!(registry.add_to_cart_forms.is_empty());
    }

    #[test]
    fn test_persisted_dark_preference_is_read_at_construction() {
        let page = sample_page();
        let config = ThemeConfig::new("http://127.0.0.1:9").expect("valid config");
        let controller = ThemeController::new(
            config,
            &page,
            Box::new(MemoryStore::with(ThemeMode::Dark)),
            Box::new(LogAlert),
        );
        assert!(controller.state().is_dark);
    }

    #[test]
    fn test_toggle_theme_updates_root_icons_and_store() {
        let mut page = sample_page();
        let mut controller = controller(&page);
        let root = page.root();
        let sun = controller.registry().sun_icons[0];
        let moon = controller.registry().moon_icons[0];

        controller.toggle_theme(&mut page);
        assert!(controller.state().is_dark);
        assert!(page.get(root).has_class("dark"));
        assert!(!page.get(sun).hidden);
        assert!(page.get(moon).hidden);
        assert_eq!(controller.store.load(), Some(ThemeMode::Dark));

        controller.toggle_theme(&mut page);
        assert!(!controller.state().is_dark);
        assert!(!page.get(root).has_class("dark"));
        assert!(page.get(sun).hidden);
        assert!(!page.get(moon).hidden);
        assert_eq!(controller.store.load(), Some(ThemeMode::Light));
    }

    #[test]
    fn test_scroll_threshold() {
        let mut page = sample_page();
        let mut controller = controller(&page);
        let header = controller.registry().header.expect("header");

        controller.handle_scroll(&mut page, 10.0);
        assert!(!controller.state().is_scrolled);
        assert!(!page.get(header).has_class("scrolled"));

        controller.handle_scroll(&mut page, 11.0);
        assert!(controller.state().is_scrolled);
        assert!(page.get(header).has_class("scrolled"));

        controller.handle_scroll(&mut page, 5.0);
        assert!(!controller.state().is_scrolled);
        assert!(!page.get(header).has_class("scrolled"));
    }

    #[test]
    fn test_scroll_class_written_once_per_direction_change() {
        let mut page = sample_page();
        let mut controller = controller(&page);
        let header = controller.registry().header.expect("header");

        controller.handle_scroll(&mut page, 50.0);
        assert!(page.get(header).has_class("scrolled"));

        // Strip the class behind the controller's back; further same-side
        // events must not re-write it.
        page.get_mut(header).remove_class("scrolled");
        controller.handle_scroll(&mut page, 60.0);
        controller.handle_scroll(&mut page, 70.0);
        assert!(!page.get(header).has_class("scrolled"));

        // The next direction change writes it again.
        controller.handle_scroll(&mut page, 0.0);
        controller.handle_scroll(&mut page, 30.0);
        assert!(page.get(header).has_class("scrolled"));
    }

    #[test]
    fn test_navbar_colors_matrix() {
        let mut page = sample_page();
        let mut controller = controller(&page);
        let logo = controller.registry().logo_text.expect("logo");
        let link = controller.registry().nav_links[0];

        // At top: white regardless of theme.
        controller.handle_scroll(&mut page, 0.0);
        controller.toggle_theme(&mut page); // dark
        assert!(page.get(logo).has_class("text-white"));

        // Scrolled + dark: white.
        controller.handle_scroll(&mut page, 20.0);
        assert!(page.get(logo).has_class("text-white"));
        assert!(page.get(link).has_class("hover:text-red-500"));

        // Scrolled + light: black.
        controller.toggle_theme(&mut page); // light
        assert!(page.get(logo).has_class("text-black"));
        assert_eq!(
            page.get(link).classes(),
            ["nav-link", "transition-colors", "hover:text-red-500", "text-black"]
        );

        // Back to top: white again.
        controller.handle_scroll(&mut page, 0.0);
        assert!(page.get(logo).has_class("text-white"));
    }

    #[test]
    fn test_navbar_update_requires_header_and_navbar() {
        // A page with a navbar but no .site-header: scroll transitions
        // must leave the page untouched and not panic.
        let mut page = Page::new();
        let navbar = page.append(page.root(), Element::new("nav").with_attr("data-navbar", ""));
        let mut controller = controller(&page);

        controller.handle_scroll(&mut page, 50.0);
        assert!(controller.state().is_scrolled);
        assert!(!page.get(navbar).has_class("scrolled"));
    }

    #[tokio::test]
    async fn test_submit_ignores_unmarked_forms() {
        let mut page = sample_page();
        let form = page.append(page.root(), Element::new("form"));
        let mut controller = controller(&page);

        let outcome = controller
            .handle_submit(&mut page, form, Instant::now())
            .await;
        assert_eq!(outcome, SubmitOutcome::NotHandled);
    }

    #[test]
    fn test_flush_reverts_applies_only_due_entries() {
        let mut page = sample_page();
        let button = page.append(page.root(), Element::new("button").with_attr("type", "submit"));
        page.get_mut(button).text = "✓ Agregado".to_string();
        let mut controller = controller(&page);

        let now = Instant::now();
        controller.pending_reverts.push(LabelRevert {
            button,
            label: "Agregar al carrito".to_string(),
            due: now + std::time::Duration::from_secs(2),
        });

        controller.flush_reverts(&mut page, now + std::time::Duration::from_secs(1));
        assert_eq!(page.get(button).text, "✓ Agregado");
        assert!(controller.next_revert_due().is_some());

        controller.flush_reverts(&mut page, now + std::time::Duration::from_secs(2));
        assert_eq!(page.get(button).text, "Agregar al carrito");
        assert!(controller.next_revert_due().is_none());
    }
}
