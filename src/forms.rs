//! Form field capture and serialization.
//!
//! [`FormData`] is an ordered snapshot of a form's named controls, as
//! captured at submit time. It serializes two ways: as a JSON object (first
//! value wins for repeated names) and as urlencoded pairs for the cart-add
//! POST body.

use serde_json::{Map, Value};

/// Ordered `(name, value)` pairs captured from a form's controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    /// Create an empty field list.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field. Repeated names are kept in order.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First value for a field name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// All captured pairs, in capture order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Serialize form fields to a JSON object string.
///
/// Repeated field names collapse to their first value.
#[must_use]
pub fn serialize_form(form: &FormData) -> String {
    let mut object = Map::new();
    for (name, value) in form.pairs() {
        if !object.contains_key(name) {
            object.insert(name.clone(), Value::String(value.clone()));
        }
    }
    Value::Object(object).to_string()
}
