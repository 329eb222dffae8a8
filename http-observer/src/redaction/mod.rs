//! Sensitive data redaction
//!
//! Walks a JSON value and masks the value of every object key found in a
//! `SensitiveKeys` set, at any nesting depth. Matching is exact and
//! case-sensitive: `password` is masked, `Password` and `apiPassword` are not.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// Replacement written over sensitive values
pub const REDACTED_MASK: &str = "***REDACTED***";

// Field names masked when no custom set is configured
static DEFAULT_SENSITIVE_KEYS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "password",
        "token",
        "secret",
        "authorization",
        "Authorization",
        "api_key",
        "apiKey",
        "access_token",
        "refresh_token",
        "client_secret",
    ]
});

/// Set of field names whose values are masked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveKeys {
    keys: HashSet<String>,
}

impl Default for SensitiveKeys {
    fn default() -> Self {
        DEFAULT_SENSITIVE_KEYS.iter().copied().collect()
    }
}

impl SensitiveKeys {
    /// Create a set from the given names
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().collect()
    }

    /// Create an empty set (nothing is masked)
    pub fn empty() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Add a name to the set
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    /// Check if a field name is sensitive
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Number of names in the set
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over the names in the set
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Redact `value` against this set
    pub fn redact(&self, value: &Value) -> Value {
        redact(value, self)
    }
}

impl<S: Into<String>> FromIterator<S> for SensitiveKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for SensitiveKeys {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.keys.extend(iter.into_iter().map(Into::into));
    }
}

/// Return a copy of `value` with every sensitive field masked
///
/// Objects stay objects and arrays stay arrays; scalars come back as they
/// went in. The input is never modified.
pub fn redact(value: &Value, keys: &SensitiveKeys) -> Value {
    if keys.is_empty() {
        return value.clone();
    }

    match value {
        Value::Object(map) => {
            let redacted: Map<String, Value> = map
                .iter()
                .map(|(key, inner)| {
                    let inner = if keys.contains(key) {
                        Value::String(REDACTED_MASK.to_string())
                    } else {
                        redact(inner, keys)
                    };
                    (key.clone(), inner)
                })
                .collect();
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| redact(item, keys)).collect()),
        other => other.clone(),
    }
}
