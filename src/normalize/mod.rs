//! Record normalization
//!
//! Fetched records may carry keys the site generator cannot accept:
//!
//! - `__v` (document-store version marker) is removed
//! - `_id` (document-store primary key) becomes `id`
//! - any other `__`-prefixed key is renamed with a `strapi_` prefix
//!
//! Nested objects and arrays are normalized recursively.

mod cleaner;

pub use cleaner::{
    clean, cleaned, KeyRule, Normalizer, DEFAULT_REPLACEMENT_PREFIX, ID_KEY, LEGACY_ID_KEY,
    RESERVED_PREFIX, VERSION_KEY,
};
