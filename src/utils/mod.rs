//! Browser-side helpers.
//!
//! Provides:
//! - [`HttpService`] - The Mollify REST backend behind the service trait
//! - [`upload_files`] - Multipart uploads with progress
//! - [`sanitize_html`] - XSS-safe description HTML
//! - [`dom`] - Window, prompt and location helpers

pub mod dom;
pub mod fetch;
mod html;
mod service;
mod upload;

pub use fetch::{FetchError, delay};
pub use html::sanitize_html;
pub use service::HttpService;
pub use upload::upload_files;
