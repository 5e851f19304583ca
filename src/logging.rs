//! Browser console logging for the `log` facade.

use log::Level;

use crate::config::{DEBUG_LOG_LEVEL, RELEASE_LOG_LEVEL};

fn level(debug_build: bool) -> Level {
    if debug_build {
        DEBUG_LOG_LEVEL
    } else {
        RELEASE_LOG_LEVEL
    }
}

/// Install the console logger. Later calls keep the first logger.
pub fn init() {
    if console_log::init_with_level(level(cfg!(debug_assertions))).is_err() {
        log::debug!("Console logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_builds_log_less() {
        assert_eq!(level(true), Level::Debug);
        assert_eq!(level(false), Level::Warn);
        assert!(level(false) < level(true));
    }
}
