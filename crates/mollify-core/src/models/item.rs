//! Filesystem items, roots and folder identities.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Filesystem Items
// =============================================================================

/// A file or folder as listed by the backend.
///
/// Items are immutable snapshots: a refresh replaces the whole list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemItem {
    pub id: String,
    pub root_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    /// Path inside the root. Folder paths end with `/`, the root path is empty.
    #[serde(default)]
    pub path: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_file: bool,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub size: Option<u64>,
}

impl FilesystemItem {
    /// Folder item.
    pub fn folder(
        id: impl Into<String>,
        root_id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            root_id: root_id.into(),
            parent_id: None,
            name: name.into(),
            path: path.into(),
            is_file: false,
            extension: None,
            size: None,
        }
    }

    /// File item. The extension is derived from the name.
    pub fn file(
        id: impl Into<String>,
        root_id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        size: u64,
    ) -> Self {
        let name = name.into();
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .filter(|ext| !ext.is_empty());
        Self {
            id: id.into(),
            root_id: root_id.into(),
            parent_id: None,
            name,
            path: path.into(),
            is_file: true,
            extension,
            size: Some(size),
        }
    }

    /// Set the parent folder id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[inline]
    pub fn is_folder(&self) -> bool {
        !self.is_file
    }

    /// A root folder is its own root.
    pub fn is_root(&self) -> bool {
        !self.is_file && self.id == self.root_id
    }

    /// Extension of a file, empty for folders.
    pub fn file_extension(&self) -> &str {
        if self.is_file {
            self.extension.as_deref().unwrap_or("")
        } else {
            ""
        }
    }

    /// Size used for ordering; folders count as zero.
    pub fn sort_size(&self) -> u64 {
        if self.is_file {
            self.size.unwrap_or(0)
        } else {
            0
        }
    }

    /// CSS type classes (`item-file item-type-txt`, `item-folder item-root-folder`).
    pub fn type_class(&self) -> String {
        if self.is_file {
            match self.extension.as_deref() {
                Some(ext) if !ext.is_empty() => format!("item-file item-type-{}", ext),
                _ => "item-file".to_string(),
            }
        } else if self.is_root() {
            "item-folder item-root-folder".to_string()
        } else {
            "item-folder".to_string()
        }
    }

    /// Path of the parent folder inside the root, if this is not a root.
    pub fn parent_path(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        let trimmed = self.path.trim_end_matches('/');
        Some(match trimmed.rfind('/') {
            Some(idx) => &self.path[..=idx],
            None => "",
        })
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    })
}

fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

// =============================================================================
// Roots
// =============================================================================

/// A top-level storage location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    pub id: String,
    pub name: String,
}

impl Root {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The root as a folder item (its own root, empty path).
    pub fn to_item(&self) -> FilesystemItem {
        FilesystemItem::folder(self.id.clone(), self.id.clone(), self.name.clone(), "")
    }
}

// =============================================================================
// Folder Identity
// =============================================================================

/// Synthetic folder produced by a custom folder type (e.g. search results).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFolder {
    #[serde(rename = "type")]
    pub folder_type: String,
    pub id: String,
}

impl CustomFolder {
    pub fn new(folder_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            folder_type: folder_type.into(),
            id: id.into(),
        }
    }
}

/// The folder currently shown by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Folder {
    /// A real folder from the backend.
    Item(FilesystemItem),
    /// A custom folder type descriptor.
    Custom(CustomFolder),
}

impl Folder {
    /// Public id used for navigation history: `id` or `type/id`.
    pub fn public_id(&self) -> String {
        match self {
            Self::Item(item) => item.id.clone(),
            Self::Custom(custom) => format!("{}/{}", custom.folder_type, custom.id),
        }
    }

    pub fn as_item(&self) -> Option<&FilesystemItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Custom(_) => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomFolder> {
        match self {
            Self::Custom(custom) => Some(custom),
            Self::Item(_) => None,
        }
    }
}

/// Parsed form of a public folder id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderId {
    /// Plain backend folder id.
    Plain(String),
    /// `type/id`; the id part may itself contain `/`.
    Typed { folder_type: String, id: String },
}

impl FolderId {
    /// Parse a public id. Returns `None` for the empty id.
    pub fn parse(id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        Some(match id.split_once('/') {
            Some((folder_type, rest)) => Self::Typed {
                folder_type: folder_type.to_string(),
                id: rest.to_string(),
            },
            None => Self::Plain(id.to_string()),
        })
    }
}

/// Navigation target accepted by the file view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderTarget {
    /// The first root, if any.
    Default,
    /// A public folder id (`id` or `type/id`).
    Id(String),
    /// A concrete folder.
    Folder(Folder),
}

impl From<&FilesystemItem> for FolderTarget {
    fn from(item: &FilesystemItem) -> Self {
        Self::Folder(Folder::Item(item.clone()))
    }
}

impl From<&Root> for FolderTarget {
    fn from(root: &Root) -> Self {
        Self::Folder(Folder::Item(root.to_item()))
    }
}

impl From<CustomFolder> for FolderTarget {
    fn from(custom: CustomFolder) -> Self {
        Self::Folder(Folder::Custom(custom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_item_fields() {
        let item: FilesystemItem = serde_json::from_value(serde_json::json!({
            "id": "f1",
            "root_id": "r1",
            "name": "report.pdf",
            "path": "docs/report.pdf",
            "is_file": "1",
            "extension": "pdf",
            "size": "2048"
        }))
        .unwrap();
        assert!(item.is_file);
        assert_eq!(item.size, Some(2048));
        assert_eq!(item.type_class(), "item-file item-type-pdf");
    }

    #[test]
    fn test_type_class_for_folders() {
        let root = Root::new("r1", "Docs").to_item();
        assert!(root.is_root());
        assert_eq!(root.type_class(), "item-folder item-root-folder");

        let sub = FilesystemItem::folder("d1", "r1", "sub", "sub/");
        assert_eq!(sub.type_class(), "item-folder");
        assert_eq!(sub.file_extension(), "");
    }

    #[test]
    fn test_parent_path() {
        let file = FilesystemItem::file("f1", "r1", "a.txt", "docs/sub/a.txt", 1);
        assert_eq!(file.parent_path(), Some("docs/sub/"));
        let folder = FilesystemItem::folder("d1", "r1", "sub", "docs/sub/");
        assert_eq!(folder.parent_path(), Some("docs/"));
        let top = FilesystemItem::folder("d2", "r1", "docs", "docs/");
        assert_eq!(top.parent_path(), Some(""));
        assert_eq!(Root::new("r1", "Docs").to_item().parent_path(), None);
    }

    #[test]
    fn test_folder_id_parsing() {
        assert_eq!(FolderId::parse(""), None);
        assert_eq!(FolderId::parse("r1"), Some(FolderId::Plain("r1".into())));
        assert_eq!(
            FolderId::parse("search/a/b"),
            Some(FolderId::Typed {
                folder_type: "search".into(),
                id: "a/b".into()
            })
        );
    }

    #[test]
    fn test_public_id() {
        let custom = Folder::Custom(CustomFolder::new("search", "report"));
        assert_eq!(custom.public_id(), "search/report");
        let item = Folder::Item(FilesystemItem::folder("d1", "r1", "sub", "sub/"));
        assert_eq!(item.public_id(), "d1");
    }
}
