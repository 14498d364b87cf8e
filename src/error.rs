//! Error types for the persistent key-value layer.
//!
//! DOM plumbing keeps using `JsValue` as its error type, as `wasm-bindgen`
//! entry points require. Storage errors are typed so the helper can log a
//! precise reason before falling back to memory.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of the browser key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// `window.localStorage` is missing or access was denied.
    #[error("local storage is not available")]
    Unavailable,

    /// The store threw (quota exceeded, private mode, ...).
    #[error("storage call failed: {0}")]
    Js(String),

    /// The stored value could not be encoded or decoded as JSON.
    #[error("invalid stored value: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Wraps a thrown JS value, keeping only its printable form.
    pub fn from_js(value: &JsValue) -> Self {
        StorageError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<StorageError> for JsValue {
    fn from(err: StorageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(StorageError::Unavailable.to_string(), "local storage is not available");
        assert_eq!(
            StorageError::Js("QuotaExceededError".into()).to_string(),
            "storage call failed: QuotaExceededError"
        );
    }

    #[test]
    fn json_errors_convert() {
        let bad = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: StorageError = bad.into();
        assert!(matches!(err, StorageError::Serialize(_)));
    }
}
