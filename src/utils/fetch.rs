//! Network fetching with timeout support.
//!
//! Thin wrapper over the Fetch API. Requests race a timeout promise and
//! return the raw status and body; decoding the Mollify envelope is left
//! to [`mollify_core::service::decode_response`].

use std::fmt;

use js_sys::{Array, Promise};
use mollify_core::ServiceError;
use mollify_core::service::ApiRequest;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::FETCH_TIMEOUT_MS;

// =============================================================================
// Errors
// =============================================================================

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// Browser window not available
    NoWindow,
    /// Failed to create HTTP request
    RequestCreationFailed,
    /// Network request failed (CORS, offline, etc.)
    NetworkError(String),
    /// Failed to read response body
    ResponseReadFailed,
    /// Invalid response content (not text)
    InvalidContent,
    /// Request timed out
    Timeout,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "Browser window not available"),
            Self::RequestCreationFailed => write!(f, "Failed to create request"),
            Self::NetworkError(msg) => write!(f, "Network error: {}", msg),
            Self::ResponseReadFailed => write!(f, "Failed to read response"),
            Self::InvalidContent => write!(f, "Invalid response content"),
            Self::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<FetchError> for ServiceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => ServiceError::Timeout,
            FetchError::InvalidContent | FetchError::ResponseReadFailed => {
                ServiceError::Decode(err.to_string())
            }
            other => ServiceError::Network(other.to_string()),
        }
    }
}

// =============================================================================
// Promise Racing
// =============================================================================

/// Result of a promise race with timeout.
#[derive(Debug)]
pub enum RaceResult {
    /// The promise completed before timeout.
    Completed(JsValue),
    /// Timeout occurred before promise completed.
    TimedOut,
    /// Promise rejected with an error.
    Error(String),
}

/// Race a promise against a timeout using `Promise.race`.
pub async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error("Window not available".to_string());
    };

    // Resolves to undefined
    let timeout_promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let race_array = Array::new();
    race_array.push(&promise);
    race_array.push(&timeout_promise);
    let race_promise = Promise::race(&race_array);

    match JsFuture::from(race_promise).await {
        Ok(result) if result.is_undefined() => RaceResult::TimedOut,
        Ok(result) => RaceResult::Completed(result),
        Err(e) => RaceResult::Error(e.as_string().unwrap_or_else(|| "Unknown error".to_string())),
    }
}

/// Wait `ms` milliseconds.
pub async fn delay(ms: i32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
    });
    let _ = JsFuture::from(promise).await;
}

// =============================================================================
// Requests
// =============================================================================

/// Raw HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Send `request` to `base_url` and read the body as text.
///
/// Non-2xx statuses are not errors here; the envelope decoder decides.
pub async fn send(base_url: &str, request: &ApiRequest) -> Result<RawResponse, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;
    let url = format!("{}{}", base_url, request.path);

    let opts = RequestInit::new();
    opts.set_method(request.method.as_str());
    opts.set_mode(RequestMode::SameOrigin);
    if let Some(body) = &request.body {
        opts.set_body(&JsValue::from_str(&body.to_string()));
    }

    let http_request =
        Request::new_with_str_and_init(&url, &opts).map_err(|_| FetchError::RequestCreationFailed)?;
    if request.body.is_some() {
        http_request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| FetchError::RequestCreationFailed)?;
    }

    log::debug!("{} {}", request.method.as_str(), url);
    let fetch_promise = window.fetch_with_request(&http_request);

    match race_with_timeout(fetch_promise, FETCH_TIMEOUT_MS).await {
        RaceResult::TimedOut => Err(FetchError::Timeout),
        RaceResult::Error(msg) => Err(FetchError::NetworkError(msg)),
        RaceResult::Completed(result) => {
            let resp: Response = result.dyn_into().map_err(|_| FetchError::InvalidContent)?;
            let text = JsFuture::from(resp.text().map_err(|_| FetchError::ResponseReadFailed)?)
                .await
                .map_err(|_| FetchError::ResponseReadFailed)?;
            Ok(RawResponse {
                status: resp.status(),
                body: text.as_string().ok_or(FetchError::InvalidContent)?,
            })
        }
    }
}
