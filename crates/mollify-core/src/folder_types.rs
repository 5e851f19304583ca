//! Custom folder types.
//!
//! A custom folder type turns a `type/id` folder id into listing data and
//! may contribute a header, deselect cleanup and per-item hints. Search
//! results are the built-in type.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::config::SEARCH_FOLDER_TYPE;
use crate::error::ServiceError;
use crate::models::{CustomFolder, DataRequest, FolderData};
use crate::service::{FilesystemService, ServiceFuture};
use crate::texts::Texts;

/// Header rendered above a custom folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomHeader {
    pub title: String,
    pub description: String,
}

/// Extra information attached to a listed item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemHint {
    pub item_id: String,
    pub tooltip: String,
}

/// A pluggable folder type.
pub trait FolderType: Send + Sync {
    /// Resolve the id part of `type/id` into folder data.
    fn select_folder<'a>(
        &'a self,
        id: &'a str,
        service: &'a dyn FilesystemService,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderData>;

    fn render_header(
        &self,
        _folder: &CustomFolder,
        _data: &FolderData,
        _texts: &Texts,
    ) -> Option<CustomHeader> {
        None
    }

    /// The folder is being left.
    fn on_folder_deselect(&self, _folder: &CustomFolder) {}

    /// Hints for the rendered items.
    fn on_item_list_rendered(
        &self,
        _folder: &CustomFolder,
        _data: &FolderData,
        _texts: &Texts,
    ) -> Vec<ItemHint> {
        Vec::new()
    }
}

/// Folder types by name.
#[derive(Clone, Default)]
pub struct FolderTypeRegistry {
    types: HashMap<String, Arc<dyn FolderType>>,
}

impl std::fmt::Debug for FolderTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.types.keys()).finish()
    }
}

impl FolderTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the search type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(SEARCH_FOLDER_TYPE, Arc::new(SearchFolderType));
        registry
    }

    /// Register a type; replaces a previous one of the same name.
    pub fn register(&mut self, name: impl Into<String>, folder_type: Arc<dyn FolderType>) {
        self.types.insert(name.into(), folder_type);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FolderType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

// =============================================================================
// Search
// =============================================================================

/// Search results; the id is the query text.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchFolderType;

impl SearchFolderType {
    fn empty_result(text: &str) -> FolderData {
        FolderData {
            context: json!({ "text": text, "count": 0, "matches": {} }),
            ..FolderData::default()
        }
    }
}

async fn run_search(
    text: &str,
    service: &dyn FilesystemService,
    data: &DataRequest,
) -> Result<FolderData, ServiceError> {
    if text.is_empty() {
        return Ok(SearchFolderType::empty_result(text));
    }
    log::debug!("Searching for '{}'", text);
    let result = service.search(text, data).await?;

    let mut matches = Map::new();
    let mut items = Vec::with_capacity(result.matches.len());
    for (id, hit) in result.matches {
        let types: Vec<Value> = hit
            .matches
            .iter()
            .map(|m| Value::String(m.match_type.clone()))
            .collect();
        matches.insert(id, Value::Array(types));
        items.push(hit.item);
    }

    Ok(FolderData {
        items,
        data: result.data,
        context: json!({ "text": text, "count": result.count, "matches": matches }),
        ..FolderData::default()
    })
}

impl FolderType for SearchFolderType {
    fn select_folder<'a>(
        &'a self,
        id: &'a str,
        service: &'a dyn FilesystemService,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderData> {
        Box::pin(run_search(id, service, data))
    }

    fn render_header(
        &self,
        _folder: &CustomFolder,
        data: &FolderData,
        texts: &Texts,
    ) -> Option<CustomHeader> {
        let text = data.context.get("text").and_then(Value::as_str).unwrap_or("");
        let count = data
            .context
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        Some(CustomHeader {
            title: texts.get("mainViewSearchResultsTitle"),
            description: texts.get_with("mainViewSearchResultsDesc", &[&count.to_string(), text]),
        })
    }

    fn on_item_list_rendered(
        &self,
        _folder: &CustomFolder,
        data: &FolderData,
        texts: &Texts,
    ) -> Vec<ItemHint> {
        let Some(matches) = data.context.get("matches").and_then(Value::as_object) else {
            return Vec::new();
        };
        matches
            .iter()
            .map(|(id, types)| {
                let kinds: Vec<String> = types
                    .as_array()
                    .map(|t| t.iter().filter_map(Value::as_str).map(|k| match_label(texts, k)).collect())
                    .unwrap_or_default();
                ItemHint {
                    item_id: id.clone(),
                    tooltip: format!(
                        "{} {}",
                        texts.get("mainViewSearchResultTooltipMatches"),
                        kinds.join(", ")
                    ),
                }
            })
            .collect()
    }
}

fn match_label(texts: &Texts, kind: &str) -> String {
    let mut key = String::from("mainViewSearchResultTooltipMatch");
    let mut chars = kind.chars();
    if let Some(first) = chars.next() {
        key.extend(first.to_uppercase());
        key.push_str(chars.as_str());
    }
    if texts.has(&key) {
        texts.get(&key)
    } else {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        let registry = FolderTypeRegistry::with_builtins();
        assert!(registry.contains("search"));
        assert!(registry.get("tags").is_none());
    }

    #[test]
    fn test_search_header_and_hints() {
        let texts = Texts::default();
        let folder = CustomFolder::new("search", "report");
        let data = FolderData {
            context: json!({
                "text": "report",
                "count": 2,
                "matches": {"f1": ["name", "description"], "f2": ["custom"]}
            }),
            ..FolderData::default()
        };
        let header = SearchFolderType.render_header(&folder, &data, &texts).unwrap();
        assert_eq!(header.title, "Search results");
        assert_eq!(header.description, "Found 2 items matching \"report\"");

        let hints = SearchFolderType.on_item_list_rendered(&folder, &data, &texts);
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].tooltip, "Matches: name, description");
        assert_eq!(hints[1].tooltip, "Matches: custom");
    }

    #[test]
    fn test_empty_search_result() {
        let data = SearchFolderType::empty_result("");
        assert!(data.items.is_empty());
        assert_eq!(data.context["count"], 0);
    }
}
