//! Application configuration.
//!
//! Compile-time constants for the browser front end. Session-dependent
//! settings (roots, features, list columns) come from the backend.

// =============================================================================
// Backend
// =============================================================================

/// Base URL of the Mollify REST service, relative to the page.
pub const SERVICE_BASE_URL: &str = "backend/r.php/";

/// Session info endpoint, relative to [`SERVICE_BASE_URL`].
pub const SESSION_PATH: &str = "session/info/";

/// Localized UI texts, relative to the page. Missing keys keep the
/// built-in English.
pub const TEXTS_PATH: &str = "localization/texts.json";

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

// =============================================================================
// Logging
// =============================================================================

/// Console log level for debug builds.
pub const DEBUG_LOG_LEVEL: log::Level = log::Level::Debug;

/// Console log level for release builds.
pub const RELEASE_LOG_LEVEL: log::Level = log::Level::Warn;

// =============================================================================
// Notices
// =============================================================================

/// How long a notice stays on screen, in milliseconds.
pub const NOTICE_TIMEOUT_MS: i32 = 4000;

// =============================================================================
// Location
// =============================================================================

/// Query parameter holding a `root/path` to open on load.
pub const PATH_PARAM: &str = "path";

// =============================================================================
// Icon Theme
// =============================================================================

/// Available icon themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconTheme {
    Lucide,
    Bootstrap,
}

/// Active icon theme. Change this to switch all icons at once.
pub const ICON_THEME: IconTheme = IconTheme::Lucide;
