//! Storefront theme runtime.
//!
//! This crate provides the theme layer of the storefront as a library:
//! a small utility toolbox (money formatting, form serialization, focus
//! trapping, media pausing, debouncing, cart fetch) and a controller that
//! owns the theme and navbar state and drives the add-to-cart and
//! cart-count flows against the storefront's AJAX endpoints.
//!
//! The page is modeled explicitly ([`page::Page`]) and the controller is
//! fed events by a host loop; nothing here touches global state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod focus;
pub mod forms;
pub mod media;
pub mod money;
pub mod page;
pub mod prefs;

pub use cart::{CartClient, CartSnapshot};
pub use config::ThemeConfig;
pub use controller::{AlertSink, SubmitOutcome, ThemeController, ThemeState, UiRegistry};
pub use debounce::Debouncer;
pub use error::{Result, ThemeError};
pub use focus::{FocusTrap, Key, KeyEvent, KeyOutcome};
pub use forms::{FormData, serialize_form};
pub use media::pause_all_media;
pub use money::format_money;
pub use page::{Element, NodeId, Page};
pub use prefs::{FileStore, MemoryStore, PreferenceStore, ThemeMode};
