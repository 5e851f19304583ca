//! View configuration.
//!
//! Compile-time constants plus the session settings delivered by the backend.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::models::{Root, ViewStyle};
use crate::upload::UploadRules;

// =============================================================================
// Constants
// =============================================================================

/// Minimum column width when a column does not declare one.
pub const DEFAULT_MIN_COLUMN_WIDTH: u32 = 25;

/// Grace period before the upload indicator starts hiding.
pub const UPLOAD_HIDE_DELAY_MS: u32 = 1000;

/// Duration of the upload indicator hide animation.
pub const UPLOAD_ANIMATION_MS: u32 = 500;

/// Extensions for which the icon view requests thumbnails.
pub const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "jpeg"];

/// Folder type of search results.
pub const SEARCH_FOLDER_TYPE: &str = "search";

/// Maximum number of navigation history entries.
pub const MAX_HISTORY: usize = 100;

/// Columns shown when the session does not configure any.
pub const DEFAULT_LIST_COLUMNS: &[&str] = &["name", "size", "file-modified"];

// =============================================================================
// Features
// =============================================================================

pub const FEATURE_THUMBNAILS: &str = "thumbnails";
pub const FEATURE_DESCRIPTIONS: &str = "descriptions";
pub const FEATURE_RETRIEVE_URL: &str = "retrieve_url";

/// Enabled backend features.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Features(HashMap<String, Value>);

impl Features {
    pub fn with(mut self, name: &str) -> Self {
        self.0.insert(name.to_string(), Value::Bool(true));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => matches!(s.as_str(), "1" | "true"),
            _ => false,
        }
    }
}

// =============================================================================
// Column Settings
// =============================================================================

/// Per-instance column overrides from the `list-view-columns` setting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ColumnOverrides {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default, rename = "min-width")]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "title-key")]
    pub title_key: Option<String>,
}

/// A configured column: registry id plus overrides, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSelection {
    pub id: String,
    pub overrides: ColumnOverrides,
}

impl ColumnSelection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            overrides: ColumnOverrides::default(),
        }
    }
}

fn default_columns() -> Vec<ColumnSelection> {
    DEFAULT_LIST_COLUMNS
        .iter()
        .map(|id| ColumnSelection::new(*id))
        .collect()
}

/// `{"name": {}, "size": {"width": 90}}` in key order.
fn column_selection<'de, D>(deserializer: D) -> Result<Vec<ColumnSelection>, D::Error>
where
    D: Deserializer<'de>,
{
    let columns = Map::<String, Value>::deserialize(deserializer)?;
    columns
        .into_iter()
        .map(|(id, value)| {
            let overrides = match value {
                Value::Object(_) => {
                    ColumnOverrides::deserialize(value).map_err(serde::de::Error::custom)?
                }
                _ => ColumnOverrides::default(),
            };
            Ok(ColumnSelection { id, overrides })
        })
        .collect()
}

/// `file-view` settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FileViewSettings {
    #[serde(default, rename = "default-view-mode")]
    pub default_view_mode: ViewStyle,
    #[serde(
        default = "default_columns",
        rename = "list-view-columns",
        deserialize_with = "column_selection"
    )]
    pub list_view_columns: Vec<ColumnSelection>,
}

impl Default for FileViewSettings {
    fn default() -> Self {
        Self {
            default_view_mode: ViewStyle::default(),
            list_view_columns: default_columns(),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Session data relevant to the file view.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Session {
    #[serde(default, alias = "folders")]
    pub roots: Vec<Root>,
    #[serde(default)]
    pub filesystem: UploadRules,
    #[serde(default)]
    pub features: Features,
    #[serde(default, rename = "file-view")]
    pub file_view: FileViewSettings,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_roots(roots: Vec<Root>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.has(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parsing() {
        let session = Session::from_json(
            r#"{
                "roots": [{"id": "r1", "name": "Docs"}],
                "filesystem": {"forbidden_file_upload_types": ["exe"]},
                "features": {"thumbnails": true, "descriptions": "1"},
                "file-view": {
                    "default-view-mode": "small-icon",
                    "list-view-columns": {"size": {"width": 90}, "name": {}, "type": null}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(session.roots, vec![Root::new("r1", "Docs")]);
        assert!(session.has_feature(FEATURE_THUMBNAILS));
        assert!(session.has_feature(FEATURE_DESCRIPTIONS));
        assert!(!session.has_feature(FEATURE_RETRIEVE_URL));
        assert_eq!(session.file_view.default_view_mode, ViewStyle::SmallIcons);

        let ids: Vec<_> = session
            .file_view
            .list_view_columns
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["size", "name", "type"]);
        assert_eq!(session.file_view.list_view_columns[0].overrides.width, Some(90));
    }

    #[test]
    fn test_default_columns() {
        let session = Session::from_json("{}").unwrap();
        assert!(session.roots.is_empty());
        assert_eq!(session.file_view.list_view_columns.len(), DEFAULT_LIST_COLUMNS.len());
    }
}
