//! Column registry for the list view.
//!
//! Columns are registered once by id; a list selects a subset in the
//! configured order and applies per-instance overrides. Sort functions
//! return the ascending ordering and [`SortDirection`] reverses it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::config::{ColumnSelection, DEFAULT_MIN_COLUMN_WIDTH};
use crate::error::ColumnError;
use crate::format::{Formatters, internal_time_key};
use crate::models::{AuxData, DataRequest, FilesystemItem, Root, SortDirection};
use crate::texts::Texts;

/// Request id of last-modified timestamps.
pub const FILE_MODIFIED_REQUEST: &str = "core-file-modified";
/// Request id of item descriptions.
pub const ITEM_DESCRIPTION_REQUEST: &str = "core-item-description";

// =============================================================================
// Column Types
// =============================================================================

/// What sort and render functions can see besides the item.
#[derive(Clone, Copy)]
pub struct ColumnContext<'a> {
    pub data: &'a AuxData,
    pub roots: &'a [Root],
    pub formatters: &'a Formatters,
}

impl<'a> ColumnContext<'a> {
    pub fn root_name(&self, root_id: &str) -> Option<&'a str> {
        self.roots
            .iter()
            .find(|r| r.id == root_id)
            .map(|r| r.name.as_str())
    }
}

/// Ascending three-way comparison.
pub type SortFn = fn(&FilesystemItem, &FilesystemItem, &ColumnContext<'_>) -> Ordering;
/// Cell renderer.
pub type ContentFn = fn(&FilesystemItem, &ColumnContext<'_>) -> CellContent;
/// Called once after the owning list is constructed.
pub type InitFn = fn(&ColumnSpec);

/// Rendered cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellContent {
    Empty,
    Text(String),
    /// Root name followed by the path inside the root.
    RootPath { root: String, path: String },
    /// Trusted backend HTML with a plain-text tooltip.
    Html { html: String, tooltip: String },
    /// "Go into folder" affordance.
    GoIntoFolder,
}

/// Action a column performs on click instead of the default routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnAction {
    GoIntoFolder,
}

/// A list column descriptor.
#[derive(Clone)]
pub struct ColumnSpec {
    pub id: String,
    pub title: Option<String>,
    pub title_key: Option<String>,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub request_id: Option<String>,
    pub sort: SortFn,
    pub content: ContentFn,
    pub on_init: Option<InitFn>,
    pub on_click: Option<ColumnAction>,
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("title_key", &self.title_key)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("request_id", &self.request_id)
            .field("on_click", &self.on_click)
            .finish_non_exhaustive()
    }
}

impl ColumnSpec {
    pub fn new(id: impl Into<String>, sort: SortFn, content: ContentFn) -> Self {
        Self {
            id: id.into(),
            title: None,
            title_key: None,
            width: None,
            min_width: None,
            request_id: None,
            sort,
            content,
            on_init: None,
            on_click: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title_key(mut self, key: impl Into<String>) -> Self {
        self.title_key = Some(key.into());
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn on_init(mut self, hook: InitFn) -> Self {
        self.on_init = Some(hook);
        self
    }

    pub fn on_click(mut self, action: ColumnAction) -> Self {
        self.on_click = Some(action);
        self
    }

    /// Header text: explicit title, else the localized title key.
    pub fn display_title(&self, texts: &Texts) -> String {
        match (&self.title, &self.title_key) {
            (Some(title), _) => title.clone(),
            (None, Some(key)) => texts.get(key),
            (None, None) => String::new(),
        }
    }

    pub fn effective_min_width(&self) -> u32 {
        self.min_width.unwrap_or(DEFAULT_MIN_COLUMN_WIDTH)
    }

    /// Clamp a width to the column minimum.
    pub fn clamp_width(&self, width: u32) -> u32 {
        width.max(self.effective_min_width())
    }

    /// Compare in the given direction.
    pub fn compare(
        &self,
        a: &FilesystemItem,
        b: &FilesystemItem,
        direction: SortDirection,
        ctx: &ColumnContext<'_>,
    ) -> Ordering {
        direction.apply((self.sort)(a, b, ctx))
    }

    pub fn render(&self, item: &FilesystemItem, ctx: &ColumnContext<'_>) -> CellContent {
        (self.content)(item, ctx)
    }

    fn with_overrides(&self, selection: &ColumnSelection) -> Self {
        let mut spec = self.clone();
        let o = &selection.overrides;
        if o.width.is_some() {
            spec.width = o.width;
        }
        if o.min_width.is_some() {
            spec.min_width = o.min_width;
        }
        if let Some(title) = &o.title {
            spec.title = Some(title.clone());
        }
        if let Some(key) = &o.title_key {
            spec.title = None;
            spec.title_key = Some(key.clone());
        }
        spec
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Registered columns by id.
#[derive(Clone, Debug, Default)]
pub struct ColumnRegistry {
    columns: HashMap<String, ColumnSpec>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in columns.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for spec in builtin_columns() {
            if let Err(e) = registry.register(spec) {
                log::error!("Built-in column rejected: {}", e);
            }
        }
        registry
    }

    pub fn register(&mut self, spec: ColumnSpec) -> Result<(), ColumnError> {
        if spec.id.trim().is_empty() {
            return Err(ColumnError::EmptyId);
        }
        if self.columns.contains_key(&spec.id) {
            return Err(ColumnError::Duplicate(spec.id));
        }
        if let (Some(width), Some(min)) = (spec.width, spec.min_width) {
            if min > width {
                return Err(ColumnError::InvalidWidth(spec.id));
            }
        }
        self.columns.insert(spec.id.clone(), spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ColumnSpec> {
        self.columns.get(id)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in the configured order with overrides applied.
    /// Unknown ids are skipped.
    pub fn select(&self, selection: &[ColumnSelection]) -> Vec<ColumnSpec> {
        selection
            .iter()
            .filter_map(|sel| match self.columns.get(&sel.id) {
                Some(spec) => Some(spec.with_overrides(sel)),
                None => {
                    log::warn!("Unknown list column '{}'", sel.id);
                    None
                }
            })
            .collect()
    }
}

/// Data request aggregated from the columns' request ids.
pub fn data_request(columns: &[ColumnSpec]) -> DataRequest {
    let mut rq = DataRequest::new();
    for id in columns.iter().filter_map(|c| c.request_id.as_deref()) {
        rq.insert(id);
    }
    rq
}

// =============================================================================
// Collation
// =============================================================================

/// Accent-folded lowercase key (NFKD, combining marks removed).
pub fn collation_key(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Case-insensitive, accent-folded comparison; ties fall back to the
/// lowercased original.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

/// Plain text of an HTML fragment.
pub fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").trim().to_string()
}

// =============================================================================
// Built-in Columns
// =============================================================================

fn sort_name(a: &FilesystemItem, b: &FilesystemItem, _: &ColumnContext<'_>) -> Ordering {
    compare_text(&a.name, &b.name)
}

fn content_name(item: &FilesystemItem, _: &ColumnContext<'_>) -> CellContent {
    CellContent::Text(item.name.clone())
}

fn sort_path(a: &FilesystemItem, b: &FilesystemItem, ctx: &ColumnContext<'_>) -> Ordering {
    let root_a = ctx.root_name(&a.root_id).unwrap_or_default();
    let root_b = ctx.root_name(&b.root_id).unwrap_or_default();
    compare_text(root_a, root_b).then_with(|| compare_text(&a.path, &b.path))
}

fn content_path(item: &FilesystemItem, ctx: &ColumnContext<'_>) -> CellContent {
    CellContent::RootPath {
        root: ctx.root_name(&item.root_id).unwrap_or_default().to_string(),
        path: item.path.clone(),
    }
}

fn sort_type(a: &FilesystemItem, b: &FilesystemItem, _: &ColumnContext<'_>) -> Ordering {
    compare_text(a.file_extension(), b.file_extension())
}

fn content_type(item: &FilesystemItem, _: &ColumnContext<'_>) -> CellContent {
    match item.file_extension() {
        "" => CellContent::Empty,
        ext => CellContent::Text(ext.to_string()),
    }
}

fn sort_size(a: &FilesystemItem, b: &FilesystemItem, _: &ColumnContext<'_>) -> Ordering {
    a.sort_size().cmp(&b.sort_size())
}

fn content_size(item: &FilesystemItem, ctx: &ColumnContext<'_>) -> CellContent {
    match (item.is_file, item.size) {
        (true, Some(size)) => CellContent::Text(ctx.formatters.byte_size.format(size)),
        _ => CellContent::Empty,
    }
}

fn sort_file_modified(a: &FilesystemItem, b: &FilesystemItem, ctx: &ColumnContext<'_>) -> Ordering {
    if a.is_folder() && b.is_folder() {
        return Ordering::Equal;
    }
    if !ctx.data.has(FILE_MODIFIED_REQUEST) {
        return Ordering::Equal;
    }
    let key = |item: &FilesystemItem| {
        internal_time_key(ctx.data.text(FILE_MODIFIED_REQUEST, &item.id).as_deref())
    };
    key(a).cmp(&key(b))
}

fn content_file_modified(item: &FilesystemItem, ctx: &ColumnContext<'_>) -> CellContent {
    if item.is_folder() {
        return CellContent::Empty;
    }
    match ctx.data.text(FILE_MODIFIED_REQUEST, &item.id) {
        Some(ts) => match ctx.formatters.timestamp.format_internal(&ts) {
            text if text.is_empty() => CellContent::Empty,
            text => CellContent::Text(text),
        },
        None => CellContent::Empty,
    }
}

fn sort_description(a: &FilesystemItem, b: &FilesystemItem, ctx: &ColumnContext<'_>) -> Ordering {
    if !ctx.data.has(ITEM_DESCRIPTION_REQUEST) {
        return Ordering::Equal;
    }
    let text = |item: &FilesystemItem| {
        ctx.data
            .text(ITEM_DESCRIPTION_REQUEST, &item.id)
            .map(|d| strip_tags(&d))
            .unwrap_or_default()
    };
    compare_text(&text(a), &text(b))
}

fn content_description(item: &FilesystemItem, ctx: &ColumnContext<'_>) -> CellContent {
    match ctx.data.text(ITEM_DESCRIPTION_REQUEST, &item.id) {
        Some(html) => CellContent::Html {
            tooltip: strip_tags(&html),
            html,
        },
        None => CellContent::Empty,
    }
}

fn sort_none(_: &FilesystemItem, _: &FilesystemItem, _: &ColumnContext<'_>) -> Ordering {
    Ordering::Equal
}

fn content_go_into_folder(item: &FilesystemItem, _: &ColumnContext<'_>) -> CellContent {
    if item.is_folder() {
        CellContent::GoIntoFolder
    } else {
        CellContent::Empty
    }
}

/// The columns every list can use.
pub fn builtin_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("name", sort_name, content_name).title_key("fileListColumnTitleName"),
        ColumnSpec::new("path", sort_path, content_path).title_key("fileListColumnTitlePath"),
        ColumnSpec::new("type", sort_type, content_type).title_key("fileListColumnTitleType"),
        ColumnSpec::new("size", sort_size, content_size)
            .title_key("fileListColumnTitleSize")
            .min_width(75),
        ColumnSpec::new("file-modified", sort_file_modified, content_file_modified)
            .title_key("fileListColumnTitleLastModified")
            .width(180)
            .request_id(FILE_MODIFIED_REQUEST),
        ColumnSpec::new("item-description", sort_description, content_description)
            .title_key("fileListColumnTitleDescription")
            .request_id(ITEM_DESCRIPTION_REQUEST),
        ColumnSpec::new("go-into-folder", sort_none, content_go_into_folder)
            .title("")
            .width(25)
            .on_click(ColumnAction::GoIntoFolder),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<FilesystemItem> {
        vec![
            FilesystemItem::folder("d1", "r1", "Éclair", "Éclair/"),
            FilesystemItem::file("f1", "r1", "apple.txt", "apple.txt", 900),
            FilesystemItem::file("f2", "r1", "Banana.PDF", "Banana.PDF", 10),
            FilesystemItem::file("f3", "r1", "cherry", "x/cherry", 2048),
            FilesystemItem::file("f4", "r1", "eclair.txt", "eclair.txt", 2048),
        ]
    }

    fn aux() -> AuxData {
        let mut data = AuxData::new();
        data.set(FILE_MODIFIED_REQUEST, "f1", "20240102030405");
        data.set(FILE_MODIFIED_REQUEST, "f2", "20230102030405");
        data.set(ITEM_DESCRIPTION_REQUEST, "f3", "<b>Red</b> fruit");
        data
    }

    #[test]
    fn test_comparators_are_antisymmetric_and_reflexive() {
        let registry = ColumnRegistry::with_builtins();
        let roots = [Root::new("r1", "Docs")];
        let formatters = Formatters::default();
        let data = aux();
        let ctx = ColumnContext {
            data: &data,
            roots: &roots,
            formatters: &formatters,
        };
        let items = items();

        for spec in builtin_columns() {
            let spec = registry.get(&spec.id).unwrap();
            for a in &items {
                for d in [SortDirection::Ascending, SortDirection::Descending] {
                    assert_eq!(spec.compare(a, a, d, &ctx), Ordering::Equal, "{}", spec.id);
                }
                for b in &items {
                    let asc = spec.compare(a, b, SortDirection::Ascending, &ctx);
                    let desc = spec.compare(a, b, SortDirection::Descending, &ctx);
                    assert_eq!(asc, desc.reverse(), "{} {} {}", spec.id, a.id, b.id);
                    assert_eq!(asc, spec.compare(b, a, SortDirection::Ascending, &ctx).reverse());
                }
            }
        }
    }

    #[test]
    fn test_name_collation() {
        assert_eq!(collation_key("Éclair"), "eclair");
        assert_eq!(compare_text("Apple", "apple"), Ordering::Equal);
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("éa", "eb"), Ordering::Less);
    }

    #[test]
    fn test_missing_aux_data_is_equal() {
        let formatters = Formatters::default();
        let data = AuxData::new();
        let ctx = ColumnContext {
            data: &data,
            roots: &[],
            formatters: &formatters,
        };
        let items = items();
        let spec = ColumnRegistry::with_builtins();
        let modified = spec.get("file-modified").unwrap();
        assert_eq!(
            modified.compare(&items[1], &items[2], SortDirection::Ascending, &ctx),
            Ordering::Equal
        );
    }

    #[test]
    fn test_registration_validation() {
        let mut registry = ColumnRegistry::with_builtins();
        assert_eq!(
            registry.register(ColumnSpec::new("", sort_none, content_name)),
            Err(ColumnError::EmptyId)
        );
        assert_eq!(
            registry.register(ColumnSpec::new("name", sort_none, content_name)),
            Err(ColumnError::Duplicate("name".into()))
        );
        assert_eq!(
            registry.register(
                ColumnSpec::new("narrow", sort_none, content_name)
                    .width(10)
                    .min_width(20)
            ),
            Err(ColumnError::InvalidWidth("narrow".into()))
        );
        assert!(registry.register(ColumnSpec::new("extra", sort_none, content_name)).is_ok());
    }

    #[test]
    fn test_select_applies_overrides_and_skips_unknown() {
        let registry = ColumnRegistry::with_builtins();
        let mut size = ColumnSelection::new("size");
        size.overrides.width = Some(120);
        size.overrides.title = Some("Bytes".into());
        let selected = registry.select(&[
            ColumnSelection::new("name"),
            ColumnSelection::new("bogus"),
            size,
            ColumnSelection::new("file-modified"),
        ]);
        let ids: Vec<_> = selected.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["name", "size", "file-modified"]);
        assert_eq!(selected[1].width, Some(120));
        assert_eq!(selected[1].display_title(&Texts::default()), "Bytes");
        assert_eq!(selected[1].clamp_width(30), 75);
        assert_eq!(registry.get("size").unwrap().width, None);

        let rq = data_request(&selected);
        assert!(rq.contains(FILE_MODIFIED_REQUEST));
        assert!(!rq.contains(ITEM_DESCRIPTION_REQUEST));
    }

    #[test]
    fn test_cell_content() {
        let formatters = Formatters::default();
        let data = aux();
        let roots = [Root::new("r1", "Docs")];
        let ctx = ColumnContext {
            data: &data,
            roots: &roots,
            formatters: &formatters,
        };
        let items = items();
        let registry = ColumnRegistry::with_builtins();

        assert_eq!(
            registry.get("size").unwrap().render(&items[3], &ctx),
            CellContent::Text("2 kB".into())
        );
        assert_eq!(registry.get("size").unwrap().render(&items[0], &ctx), CellContent::Empty);
        assert_eq!(
            registry.get("path").unwrap().render(&items[3], &ctx),
            CellContent::RootPath {
                root: "Docs".into(),
                path: "x/cherry".into()
            }
        );
        assert_eq!(
            registry.get("item-description").unwrap().render(&items[3], &ctx),
            CellContent::Html {
                html: "<b>Red</b> fruit".into(),
                tooltip: "Red fruit".into()
            }
        );
        assert_eq!(
            registry.get("go-into-folder").unwrap().render(&items[0], &ctx),
            CellContent::GoIntoFolder
        );
    }
}
