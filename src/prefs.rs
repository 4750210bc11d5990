//! Theme preference persistence.
//!
//! The preference is a single key (`theme`) with the wire values `"dark"`
//! and `"light"`. [`PreferenceStore`] is the seam: the shipped
//! [`FileStore`] keeps a JSON key-value file next to other local state,
//! and [`MemoryStore`] backs tests and the demo.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Storage key for the theme preference.
pub const THEME_KEY: &str = "theme";

/// Light or dark theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Wire value, `"dark"` or `"light"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a stored value. Anything but `"dark"` is light.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == "dark" { Self::Dark } else { Self::Light }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Persistence seam for the theme preference.
pub trait PreferenceStore {
    /// Load the stored preference; `None` if nothing is stored or the
    /// store is unreadable.
    fn load(&self) -> Option<ThemeMode>;

    /// Persist the preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&mut self, mode: ThemeMode) -> Result<()>;
}

/// JSON key-value file store.
///
/// The file holds a flat string map so the theme preference can coexist
/// with other locally persisted keys.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given file path. The file is created
    /// on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the key-value map, tolerating a missing or corrupt file.
    fn read_map(&self) -> Map<String, Value> {
        let Ok(text) = std::fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Preference file unreadable, starting fresh");
                Map::new()
            }
        }
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Option<ThemeMode> {
        let map = self.read_map();
        let value = map.get(THEME_KEY)?.as_str()?;
        Some(ThemeMode::from_value(value))
    }

    fn save(&mut self, mode: ThemeMode) -> Result<()> {
        let mut map = self.read_map();
        map.insert(
            THEME_KEY.to_string(),
            Value::String(mode.as_str().to_string()),
        );
        std::fs::write(&self.path, Value::Object(map).to_string())?;
        Ok(())
    }
}

/// In-memory store for tests and the demo binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stored: Option<ThemeMode>,
}

impl MemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { stored: None }
    }

    /// A store seeded with a preference.
    #[must_use]
    pub const fn with(mode: ThemeMode) -> Self {
        Self { stored: Some(mode) }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Option<ThemeMode> {
        self.stored
    }

    fn save(&mut self, mode: ThemeMode) -> Result<()> {
        self.stored = Some(mode);
        Ok(())
    }
}
