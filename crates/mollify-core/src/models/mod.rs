//! Data models and types for the file view.
//!
//! Contains domain types for:
//! - [`FilesystemItem`], [`Root`], [`Folder`] - Items listed by the backend
//! - [`DataRequest`], [`AuxData`] - Auxiliary data side channel
//! - [`FolderInfo`], [`SearchResult`], [`FolderData`] - Listing payloads
//! - [`ViewStyle`], [`SortDirection`] - View management

mod data;
mod item;
mod view;

pub use data::{
    AccessLevel, AuxData, DataRequest, EDIT_DESCRIPTION, FolderData, FolderInfo, ITEM_ACCESS,
    MatchInfo, PARENT_DESCRIPTION, Permissions, SearchMatch, SearchResult,
};
pub use item::{CustomFolder, FilesystemItem, Folder, FolderId, FolderTarget, Root};
pub use view::{SortDirection, ViewStyle};
