//! Mollify file view model.
//!
//! Headless state for the Mollify folder browser: formatting, the column
//! registry, the list and icon widgets, selection, drag and drop, upload
//! rules and the [`FileView`] navigation state machine. The browser front
//! end renders this state and performs the I/O it asks for through a
//! [`FilesystemService`].

pub mod columns;
pub mod config;
pub mod dnd;
pub mod error;
pub mod file_view;
pub mod folder_types;
pub mod format;
pub mod models;
pub mod selection;
pub mod service;
pub mod texts;
pub mod update_log;
pub mod upload;
pub mod widgets;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use columns::{CellContent, ColumnRegistry, ColumnSpec};
pub use config::Session;
pub use dnd::{DragPayload, DropType, Transfer};
pub use error::{ColumnError, ConfigError, NavigationError, ServiceError};
pub use file_view::{
    Action, ActivateParams, Command, FileView, Header, ItemDetails, NavState, Notice, Outcome,
    Pending, Resolution, Step, ViewEnv,
};
pub use folder_types::{FolderType, FolderTypeRegistry, SearchFolderType};
pub use format::Formatters;
pub use models::*;
pub use service::{FilesystemService, ServiceFuture, SharedService};
pub use texts::Texts;
pub use widgets::{ClickTarget, ItemWidget, Widget, WidgetEvent};
