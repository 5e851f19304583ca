//! UI components built with Leptos.
//!
//! - [`file_view`] - Folder browser: toolbar, header, list and icon views
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod file_view;
pub mod icons;
