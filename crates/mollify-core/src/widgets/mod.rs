//! Item widgets: the list (table) and the icon grid.
//!
//! Both widgets keep their own presentation state and turn raw pointer
//! input into [`WidgetEvent`]s for the owning file view.

mod file_list;
mod icon_view;

pub use file_list::{FileList, HeaderCell, Row};
pub use icon_view::{IconRegion, IconView, Tile};

use crate::models::{AuxData, DataRequest, FilesystemItem, ViewStyle};

/// Where an item was clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The item icon (list view).
    Icon,
    /// A list column, by column id.
    Column(String),
    /// Info sub-region of an icon tile.
    Info,
    /// Any other part of an icon tile.
    Tile,
}

impl ClickTarget {
    pub fn is_column(&self, id: &str) -> bool {
        matches!(self, Self::Column(c) if c == id)
    }
}

/// Interaction reported to the owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    SelectUnselect(FilesystemItem),
    Click {
        item: FilesystemItem,
        target: ClickTarget,
    },
    RightClick {
        item: FilesystemItem,
        target: ClickTarget,
    },
    DblClick(FilesystemItem),
}

/// Behaviour shared by both widgets.
pub trait ItemWidget {
    /// Auxiliary data the widget needs alongside the listing.
    fn data_request(&self) -> DataRequest;

    /// Replace the displayed items.
    fn set_content(&mut self, items: Vec<FilesystemItem>, data: AuxData);

    /// Items in display order.
    fn items(&self) -> &[FilesystemItem];

    fn data(&self) -> &AuxData;

    fn set_select_mode(&mut self, on: bool);

    fn select_mode(&self) -> bool;

    fn find(&self, id: &str) -> Option<&FilesystemItem> {
        self.items().iter().find(|i| i.id == id)
    }
}

/// The active widget.
#[derive(Clone, Debug)]
pub enum Widget {
    List(FileList),
    Icons(IconView),
}

impl Widget {
    pub fn style(&self) -> ViewStyle {
        match self {
            Self::List(_) => ViewStyle::List,
            Self::Icons(view) => view.style(),
        }
    }

    pub fn as_list(&self) -> Option<&FileList> {
        match self {
            Self::List(list) => Some(list),
            Self::Icons(_) => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut FileList> {
        match self {
            Self::List(list) => Some(list),
            Self::Icons(_) => None,
        }
    }

    pub fn as_icons(&self) -> Option<&IconView> {
        match self {
            Self::Icons(view) => Some(view),
            Self::List(_) => None,
        }
    }

    fn inner(&self) -> &dyn ItemWidget {
        match self {
            Self::List(list) => list,
            Self::Icons(view) => view,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ItemWidget {
        match self {
            Self::List(list) => list,
            Self::Icons(view) => view,
        }
    }
}

impl ItemWidget for Widget {
    fn data_request(&self) -> DataRequest {
        self.inner().data_request()
    }

    fn set_content(&mut self, items: Vec<FilesystemItem>, data: AuxData) {
        self.inner_mut().set_content(items, data)
    }

    fn items(&self) -> &[FilesystemItem] {
        self.inner().items()
    }

    fn data(&self) -> &AuxData {
        self.inner().data()
    }

    fn set_select_mode(&mut self, on: bool) {
        self.inner_mut().set_select_mode(on)
    }

    fn select_mode(&self) -> bool {
        self.inner().select_mode()
    }
}
