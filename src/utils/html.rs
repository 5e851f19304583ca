//! Backend HTML handling.
//!
//! Folder and item descriptions are stored as HTML. Everything rendered
//! through `inner_html` passes through here first.

/// Sanitize description HTML with `ammonia` to prevent XSS.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}
