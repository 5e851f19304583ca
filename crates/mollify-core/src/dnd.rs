//! Drag and drop payloads and drop rules.
//!
//! Payloads are typed once when a drag starts; drop targets only ever
//! see a [`DragPayload`].

use serde::Serialize;

use crate::models::FilesystemItem;

/// What is being dragged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragPayload {
    Item(FilesystemItem),
    Items(Vec<FilesystemItem>),
}

impl DragPayload {
    /// Payload for dragging `item` with the given selection.
    ///
    /// A non-empty selection is dragged as a whole; the dragged item is
    /// appended when it is not part of it.
    pub fn for_drag(item: &FilesystemItem, selection: &[FilesystemItem]) -> Self {
        if selection.is_empty() {
            return Self::Item(item.clone());
        }
        let mut items = selection.to_vec();
        if !items.iter().any(|i| i.id == item.id) {
            items.push(item.clone());
        }
        Self::Items(items)
    }

    pub fn items(&self) -> &[FilesystemItem] {
        match self {
            Self::Item(item) => std::slice::from_ref(item),
            Self::Items(items) => items,
        }
    }

    /// Single-element lists count as single.
    pub fn single(&self) -> Option<&FilesystemItem> {
        match self.items() {
            [one] => Some(one),
            _ => None,
        }
    }
}

/// Effect of a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropType {
    Copy,
    Move,
}

/// Move within a root, copy across roots or for several items.
pub fn drop_type(payload: &DragPayload, target: &FilesystemItem) -> DropType {
    match payload.single() {
        Some(item) if item.root_id == target.root_id => DropType::Move,
        _ => DropType::Copy,
    }
}

fn is_inside(item: &FilesystemItem, target: &FilesystemItem) -> bool {
    item.is_folder()
        && item.root_id == target.root_id
        && (item.is_root() || target.path.starts_with(&item.path))
}

fn is_parent(item: &FilesystemItem, target: &FilesystemItem) -> bool {
    match &item.parent_id {
        Some(parent) => *parent == target.id,
        None => item.root_id == target.root_id && item.parent_path() == Some(target.path.as_str()),
    }
}

fn can_drop_item(item: &FilesystemItem, target: &FilesystemItem, drop: DropType) -> bool {
    if item.id == target.id || is_inside(item, target) {
        return false;
    }
    !(drop == DropType::Move && is_parent(item, target))
}

/// Whether every dragged item may be dropped on `target`.
pub fn can_drop(payload: &DragPayload, target: &FilesystemItem) -> bool {
    if !target.is_folder() || payload.items().is_empty() {
        return false;
    }
    let drop = drop_type(payload, target);
    payload
        .items()
        .iter()
        .all(|item| can_drop_item(item, target, drop))
}

/// Body of `POST filesystem/items/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub action: DropType,
    pub items: Vec<String>,
    pub to: String,
}

impl Transfer {
    /// Transfer for a valid drop, `None` when the drop is not allowed.
    pub fn for_drop(payload: &DragPayload, target: &FilesystemItem) -> Option<Self> {
        if !can_drop(payload, target) {
            return None;
        }
        Some(Self {
            action: drop_type(payload, target),
            items: payload.items().iter().map(|i| i.id.clone()).collect(),
            to: target.id.clone(),
        })
    }
}
