//! Text resolution for derived description parameters.
//!
//! The engine returns title and description keys untouched; only a few
//! derived parameters (location and user-count phrases, entity names) are
//! materialized through a [`TextResolver`] before being embedded.

use serde_json::Value;
use std::collections::BTreeMap;

/// Resolves a message key and its parameters into display text.
pub trait TextResolver {
    fn resolve(&self, key: &str, params: &BTreeMap<String, Value>) -> String;

    /// Resolve a key that takes no parameters.
    fn resolve_plain(&self, key: &str) -> String {
        self.resolve(key, &BTreeMap::new())
    }
}

/// Key → template catalog using `{{name}}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: BTreeMap<String, String>,
}

impl MessageCatalog {
    pub fn new(messages: BTreeMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

impl TextResolver for MessageCatalog {
    fn resolve(&self, key: &str, params: &BTreeMap<String, Value>) -> String {
        match self.messages.get(key) {
            Some(template) => interpolate(template, params),
            None => key.to_string(),
        }
    }
}

/// Substitute `{{name}}` placeholders. Unknown names are left in place.
pub fn interpolate(template: &str, params: &BTreeMap<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = after[..end].trim();
        match params.get(name) {
            Some(value) => out.push_str(&value_text(value)),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
