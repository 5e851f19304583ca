//! Folder payloads and the auxiliary data side channel.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::item::FilesystemItem;

/// Aux data key for the description of the listed folder itself.
pub const PARENT_DESCRIPTION: &str = "core-parent-description";

// =============================================================================
// Data Request
// =============================================================================

/// Auxiliary data requested alongside a listing.
///
/// Serialized as `{"core-file-modified": {}, ...}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRequest(BTreeMap<String, Map<String, Value>>);

impl DataRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `key` with empty options.
    pub fn insert(&mut self, key: impl Into<String>) {
        self.0.entry(key.into()).or_default();
    }

    pub fn with(mut self, key: impl Into<String>) -> Self {
        self.insert(key);
        self
    }

    /// Add every key of `other` that is not requested yet.
    pub fn merge(&mut self, other: DataRequest) {
        for (key, options) in other.0 {
            self.0.entry(key).or_insert(options);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Aux Data
// =============================================================================

/// The `data` object of a listing: request id → (item id → value).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxData(Map<String, Value>);

impl AuxData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of `request_id` for one item.
    pub fn set(&mut self, request_id: &str, item_id: &str, value: impl Into<Value>) {
        let entry = self
            .0
            .entry(request_id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(values) = entry {
            values.insert(item_id.to_string(), value.into());
        }
    }

    /// Whether any data for `request_id` was returned.
    pub fn has(&self, request_id: &str) -> bool {
        self.0.get(request_id).is_some_and(|v| !v.is_null())
    }

    /// Raw value of `request_id` for an item.
    pub fn value(&self, request_id: &str, item_id: &str) -> Option<&Value> {
        self.0
            .get(request_id)?
            .as_object()?
            .get(item_id)
            .filter(|v| !v.is_null())
    }

    /// Value rendered as text (strings as-is, numbers formatted).
    pub fn text(&self, request_id: &str, item_id: &str) -> Option<String> {
        match self.value(request_id, item_id)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Description of the listed folder.
    pub fn parent_description(&self) -> Option<&str> {
        self.0
            .get(PARENT_DESCRIPTION)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set_parent_description(&mut self, description: impl Into<String>) {
        self.0
            .insert(PARENT_DESCRIPTION.to_string(), Value::String(description.into()));
    }
}

// =============================================================================
// Permissions
// =============================================================================

/// Permission key for item access.
pub const ITEM_ACCESS: &str = "filesystem_item_access";
/// Permission key for editing folder descriptions.
pub const EDIT_DESCRIPTION: &str = "edit_description";

/// Item access level, ordered from none to full access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    #[default]
    None,
    Read,
    ReadWrite,
    ReadWriteDelete,
}

impl AccessLevel {
    /// Parse the backend's `n` / `r` / `rw` / `rwd` notation.
    pub fn parse(value: &str) -> Self {
        match value {
            "r" | "ro" => Self::Read,
            "rw" => Self::ReadWrite,
            "rwd" => Self::ReadWriteDelete,
            _ => Self::None,
        }
    }
}

/// Permissions the current user has on a folder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(HashMap<String, Value>);

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn access(&self, name: &str) -> AccessLevel {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .map(AccessLevel::parse)
            .unwrap_or_default()
    }

    /// Whether the access permission `name` is at least `required`.
    pub fn allows(&self, name: &str, required: AccessLevel) -> bool {
        self.access(name) >= required
    }

    /// Boolean permission (`true`, `1` or `"1"`).
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
// Listings
// =============================================================================

/// Response of a folder info request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FolderInfo {
    pub folder: FilesystemItem,
    #[serde(default)]
    pub folders: Vec<FilesystemItem>,
    #[serde(default)]
    pub files: Vec<FilesystemItem>,
    /// Breadcrumbs from the root down to the folder.
    #[serde(default)]
    pub hierarchy: Vec<FilesystemItem>,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub data: AuxData,
}

/// One match kind of a search hit (e.g. `name`, `description`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(rename = "type")]
    pub match_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A search hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub item: FilesystemItem,
    #[serde(default)]
    pub matches: Vec<MatchInfo>,
}

/// Response of a search request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub matches: BTreeMap<String, SearchMatch>,
    #[serde(default)]
    pub data: AuxData,
}

/// Everything the view keeps about the folder it shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FolderData {
    /// Folders first, then files, in backend order.
    pub items: Vec<FilesystemItem>,
    pub hierarchy: Vec<FilesystemItem>,
    pub permissions: Permissions,
    pub data: AuxData,
    /// Payload owned by a custom folder type.
    pub context: Value,
}

impl From<FolderInfo> for FolderData {
    fn from(info: FolderInfo) -> Self {
        let mut items = info.folders;
        items.extend(info.files);
        Self {
            items,
            hierarchy: info.hierarchy,
            permissions: info.permissions,
            data: info.data,
            context: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_request_merge_and_serialize() {
        let mut rq = DataRequest::new().with(PARENT_DESCRIPTION);
        rq.merge(DataRequest::new().with("core-file-modified").with(PARENT_DESCRIPTION));
        assert_eq!(rq.keys().count(), 2);
        assert_eq!(
            serde_json::to_string(&rq).unwrap(),
            r#"{"core-file-modified":{},"core-parent-description":{}}"#
        );
    }

    #[test]
    fn test_aux_data_lookup() {
        let data: AuxData = serde_json::from_value(serde_json::json!({
            "core-file-modified": {"f1": "20240102030405", "f2": null},
            "core-parent-description": "Shared docs"
        }))
        .unwrap();
        assert!(data.has("core-file-modified"));
        assert!(!data.has("core-item-description"));
        assert_eq!(
            data.text("core-file-modified", "f1").as_deref(),
            Some("20240102030405")
        );
        assert_eq!(data.value("core-file-modified", "f2"), None);
        assert_eq!(data.parent_description(), Some("Shared docs"));
    }

    #[test]
    fn test_permissions() {
        let perms: Permissions = serde_json::from_value(serde_json::json!({
            "filesystem_item_access": "rw",
            "edit_description": "1"
        }))
        .unwrap();
        assert!(perms.allows(ITEM_ACCESS, AccessLevel::ReadWrite));
        assert!(!perms.allows(ITEM_ACCESS, AccessLevel::ReadWriteDelete));
        assert!(perms.has(EDIT_DESCRIPTION));
        assert_eq!(Permissions::new().access(ITEM_ACCESS), AccessLevel::None);
    }

    #[test]
    fn test_folder_info_orders_folders_first() {
        let info: FolderInfo = serde_json::from_value(serde_json::json!({
            "folder": {"id": "r1", "root_id": "r1", "name": "Docs", "path": "", "is_file": false},
            "folders": [{"id": "d1", "root_id": "r1", "name": "sub", "path": "sub/", "is_file": false}],
            "files": [{"id": "f1", "root_id": "r1", "name": "a.txt", "path": "a.txt", "is_file": true, "size": 3}]
        }))
        .unwrap();
        let data = FolderData::from(info);
        let ids: Vec<_> = data.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["d1", "f1"]);
    }
}
