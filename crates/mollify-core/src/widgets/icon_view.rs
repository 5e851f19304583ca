//! Icon grid widget.

use super::{ClickTarget, ItemWidget, WidgetEvent};
use crate::config::THUMBNAIL_EXTENSIONS;
use crate::models::{AuxData, DataRequest, FilesystemItem, ViewStyle};
use crate::service::endpoints;

/// Part of a tile that received a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconRegion {
    /// Selection toggle (select mode only).
    SelectOption,
    /// Info badge; always opens the item context.
    Info,
    Body,
}

/// Tile render model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub item: FilesystemItem,
    pub type_class: String,
    pub thumbnail: Option<String>,
}

#[derive(Clone, Debug)]
pub struct IconView {
    style: ViewStyle,
    thumbnails: bool,
    items: Vec<FilesystemItem>,
    data: AuxData,
    select_mode: bool,
}

impl IconView {
    /// `style` must be one of the icon styles; anything else means small icons.
    pub fn new(style: ViewStyle, thumbnails: bool) -> Self {
        let style = match style {
            ViewStyle::LargeIcons => ViewStyle::LargeIcons,
            _ => ViewStyle::SmallIcons,
        };
        Self {
            style,
            thumbnails,
            items: Vec::new(),
            data: AuxData::new(),
            select_mode: false,
        }
    }

    pub fn style(&self) -> ViewStyle {
        self.style
    }

    pub fn is_large(&self) -> bool {
        self.style == ViewStyle::LargeIcons
    }

    /// Thumbnail URL (relative to the service base) for image files.
    pub fn thumbnail(&self, item: &FilesystemItem) -> Option<String> {
        if !self.thumbnails || !item.is_file {
            return None;
        }
        let ext = item.file_extension().to_lowercase();
        THUMBNAIL_EXTENSIONS
            .contains(&ext.as_str())
            .then(|| endpoints::thumbnail(&item.id))
    }

    pub fn tiles(&self) -> Vec<Tile> {
        self.items
            .iter()
            .map(|item| Tile {
                item: item.clone(),
                type_class: item.type_class(),
                thumbnail: self.thumbnail(item),
            })
            .collect()
    }

    pub fn click(&self, item_id: &str, region: IconRegion) -> Option<WidgetEvent> {
        let item = self.find(item_id)?.clone();
        match region {
            IconRegion::SelectOption => self
                .select_mode
                .then_some(WidgetEvent::SelectUnselect(item)),
            IconRegion::Info => Some(WidgetEvent::Click {
                item,
                target: ClickTarget::Info,
            }),
            IconRegion::Body => Some(WidgetEvent::Click {
                item,
                target: ClickTarget::Tile,
            }),
        }
    }

    pub fn right_click(&self, item_id: &str) -> Option<WidgetEvent> {
        let item = self.find(item_id)?.clone();
        Some(WidgetEvent::RightClick {
            item,
            target: ClickTarget::Tile,
        })
    }

    pub fn dbl_click(&self, item_id: &str) -> Option<WidgetEvent> {
        self.find(item_id).cloned().map(WidgetEvent::DblClick)
    }
}

impl ItemWidget for IconView {
    fn data_request(&self) -> DataRequest {
        DataRequest::new()
    }

    fn set_content(&mut self, items: Vec<FilesystemItem>, data: AuxData) {
        self.items = items;
        self.data = data;
    }

    fn items(&self) -> &[FilesystemItem] {
        &self.items
    }

    fn data(&self) -> &AuxData {
        &self.data
    }

    fn set_select_mode(&mut self, on: bool) {
        self.select_mode = on;
    }

    fn select_mode(&self) -> bool {
        self.select_mode
    }
}
