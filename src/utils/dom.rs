//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use web_sys::Window;

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Ask the user for a line of text. `None` when cancelled.
pub fn prompt(message: &str, default: &str) -> Option<String> {
    window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}

// =============================================================================
// Browser Location
// =============================================================================

/// Get the current URL hash (without the '#' prefix), percent-decoded.
pub fn get_hash() -> String {
    let raw = window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    decode(raw.trim_start_matches('#'))
}

/// Replace the URL hash without adding to browser history.
///
/// The file view keeps its own back/forward history.
pub fn replace_hash(value: &str) {
    if let Some(window) = window()
        && let Ok(history) = window.history()
    {
        let hash = format!("#{}", encode(value));
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&hash));
    }
}

/// Value of a query string parameter of the page URL.
pub fn query_param(name: &str) -> Option<String> {
    let search = window()?.location().search().ok()?;
    parse_query(&search, name).map(|v| decode(&v))
}

fn parse_query(search: &str, name: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.replace('+', " "))
}

/// Percent-encode a location component. Keeps `/` readable.
fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value)).replace("%2F", "/")
}

fn decode(value: &str) -> String {
    js_sys::decode_uri_component(value)
        .map(String::from)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        assert_eq!(
            parse_query("?a=1&path=Docs/x+y", "path").as_deref(),
            Some("Docs/x y")
        );
        assert_eq!(parse_query("?a=1", "path"), None);
        assert_eq!(parse_query("", "path"), None);
    }
}
