//! Record key rewriting

use crate::types::{JsonObject, JsonValue};

/// Optimistic-concurrency version marker left by document stores
pub const VERSION_KEY: &str = "__v";

/// Document-store primary key
pub const LEGACY_ID_KEY: &str = "_id";

/// Key the legacy primary key is moved to
pub const ID_KEY: &str = "id";

/// Prefix reserved by the site generator
pub const RESERVED_PREFIX: &str = "__";

/// Default replacement for the reserved prefix
pub const DEFAULT_REPLACEMENT_PREFIX: &str = "strapi_";

/// What happens to a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRule {
    /// Remove the key and its value
    Drop,
    /// Move the value under a new key
    Rename(String),
    /// Keep the key, normalizing its value
    Keep,
}

/// Rewrites reserved and legacy keys in fetched records
#[derive(Debug, Clone)]
pub struct Normalizer {
    replacement_prefix: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a normalizer using the default `strapi_` replacement prefix
    pub fn new() -> Self {
        Self {
            replacement_prefix: DEFAULT_REPLACEMENT_PREFIX.to_string(),
        }
    }

    /// Use a different replacement for the reserved `__` prefix
    #[must_use]
    pub fn with_replacement_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.replacement_prefix = prefix.into();
        self
    }

    /// The replacement for the reserved prefix
    pub fn replacement_prefix(&self) -> &str {
        &self.replacement_prefix
    }

    /// Decide what to do with a key
    pub fn classify(&self, key: &str) -> KeyRule {
        if key == VERSION_KEY {
            KeyRule::Drop
        } else if key == LEGACY_ID_KEY {
            KeyRule::Rename(ID_KEY.to_string())
        } else if let Some(rest) = key.strip_prefix(RESERVED_PREFIX) {
            KeyRule::Rename(format!("{}{rest}", self.replacement_prefix))
        } else {
            KeyRule::Keep
        }
    }

    /// Normalize a value in place.
    ///
    /// Objects have their keys rewritten and kept values normalized
    /// recursively; arrays are walked element by element; scalars are left
    /// alone. Keys are visited from a snapshot taken before any rewrite, so
    /// keys added by a rename are never rewritten again. A renamed value is
    /// moved as-is; a later visit of its new key (e.g. a pre-existing `id`
    /// sorted after `_id`) normalizes it like any kept value.
    pub fn clean(&self, value: &mut JsonValue) {
        match value {
            JsonValue::Object(map) => self.clean_object(map),
            JsonValue::Array(items) => {
                for item in items {
                    self.clean(item);
                }
            }
            _ => {}
        }
    }

    /// Normalize a value and return it
    pub fn cleaned(&self, mut value: JsonValue) -> JsonValue {
        self.clean(&mut value);
        value
    }

    /// Normalize every record in a list
    pub fn clean_all(&self, records: Vec<JsonValue>) -> Vec<JsonValue> {
        records.into_iter().map(|r| self.cleaned(r)).collect()
    }

    fn clean_object(&self, map: &mut JsonObject) {
        let keys: Vec<String> = map.keys().cloned().collect();

        for key in keys {
            match self.classify(&key) {
                KeyRule::Drop => {
                    map.remove(&key);
                }
                KeyRule::Rename(new_key) => {
                    if let Some(value) = map.remove(&key) {
                        map.insert(new_key, value);
                    }
                }
                KeyRule::Keep => {
                    if let Some(value) = map.get_mut(&key) {
                        self.clean(value);
                    }
                }
            }
        }
    }
}

/// Normalize a value in place with the default normalizer
pub fn clean(value: &mut JsonValue) {
    Normalizer::new().clean(value);
}

/// Normalize a value with the default normalizer and return it
pub fn cleaned(value: JsonValue) -> JsonValue {
    Normalizer::new().cleaned(value)
}
