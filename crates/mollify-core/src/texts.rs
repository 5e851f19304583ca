//! Localized UI texts.
//!
//! English defaults are compiled in; a session may overlay its own table.
//! Parameters are positional: `{0}`, `{1}`, ...

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ConfigError, ServiceError};

/// Default English texts.
const DEFAULT_TEXTS: &str = include_str!("../assets/texts_en.json");

/// Localization table. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Texts {
    table: Arc<HashMap<String, String>>,
}

impl Default for Texts {
    fn default() -> Self {
        let table: HashMap<String, String> =
            serde_json::from_str(DEFAULT_TEXTS).unwrap_or_default();
        Self {
            table: Arc::new(table),
        }
    }
}

impl Texts {
    /// English defaults overlaid with the given JSON object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overlay: HashMap<String, String> = serde_json::from_str(json)?;
        let mut table = (*Self::default().table).clone();
        table.extend(overlay);
        Ok(Self {
            table: Arc::new(table),
        })
    }

    /// Overlay served as a static file; any non-2xx status is an error.
    pub fn from_response(status: u16, body: &str) -> Result<Self, ServiceError> {
        if !(200..300).contains(&status) {
            return Err(ServiceError::Http(status));
        }
        Self::from_json(body).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    pub fn has(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Text for `key`; unknown keys render as the key itself.
    pub fn get(&self, key: &str) -> String {
        self.table
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Text for `key` with `{n}` replaced by `params[n]`.
    pub fn get_with(&self, key: &str, params: &[&str]) -> String {
        let mut text = self.get(key);
        for (i, param) in params.iter().enumerate() {
            text = text.replace(&format!("{{{}}}", i), param);
        }
        text
    }
}
