//! Backend service contract.
//!
//! [`FilesystemService`] is the seam between the view model and the
//! transport. Request construction and response decoding live here so
//! every implementation speaks the same wire format.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dnd::Transfer;
use crate::error::ServiceError;
use crate::models::{DataRequest, FolderInfo, SearchResult};

/// Boxed future returned by service calls.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + 'a>>;

/// Service handle shared by the view and the front end.
pub type SharedService = Arc<dyn FilesystemService + Send + Sync>;

/// Backend operations used by the file view.
pub trait FilesystemService {
    /// Folder listing with the requested auxiliary data.
    fn folder_info<'a>(
        &'a self,
        folder_id: &'a str,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderInfo>;

    /// Folder listing looked up by `root/path`.
    fn find_folder<'a>(&'a self, path: &'a str, data: &'a DataRequest)
    -> ServiceFuture<'a, FolderInfo>;

    fn search<'a>(&'a self, text: &'a str, data: &'a DataRequest)
    -> ServiceFuture<'a, SearchResult>;

    /// Download `url` into the folder.
    fn retrieve<'a>(&'a self, folder_id: &'a str, url: &'a str) -> ServiceFuture<'a, ()>;

    fn set_description<'a>(
        &'a self,
        folder_id: &'a str,
        description: &'a str,
    ) -> ServiceFuture<'a, ()>;

    fn create_folder<'a>(&'a self, parent_id: &'a str, name: &'a str) -> ServiceFuture<'a, ()>;

    /// Copy or move items.
    fn transfer<'a>(&'a self, transfer: &'a Transfer) -> ServiceFuture<'a, ()>;
}

// =============================================================================
// Endpoints
// =============================================================================

/// Paths relative to the service base URL.
pub mod endpoints {
    pub const SEARCH: &str = "filesystem/search";
    pub const FIND: &str = "filesystem/find/";
    pub const ITEMS: &str = "filesystem/items/";

    /// Folder info with hierarchy.
    pub fn folder_info(folder_id: &str) -> String {
        format!("filesystem/{}/info/?h=1", folder_id)
    }

    pub fn retrieve(folder_id: &str) -> String {
        format!("filesystem/{}/retrieve", folder_id)
    }

    pub fn description(item_id: &str) -> String {
        format!("filesystem/{}/description/", item_id)
    }

    pub fn folders(folder_id: &str) -> String {
        format!("filesystem/{}/folders/", folder_id)
    }

    /// Multipart upload target.
    pub fn files(folder_id: &str) -> String {
        format!("filesystem/{}/files/", folder_id)
    }

    pub fn thumbnail(item_id: &str) -> String {
        format!("filesystem/{}/thumbnail/", item_id)
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

/// A JSON request ready to be sent.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: impl Serialize) -> Self {
        Self {
            method,
            path: path.into(),
            body: serde_json::to_value(body).ok(),
        }
    }

    pub fn folder_info(folder_id: &str, data: &DataRequest) -> Self {
        Self::new(
            Method::Post,
            endpoints::folder_info(folder_id),
            serde_json::json!({ "data": data }),
        )
    }

    pub fn find_folder(path: &str, data: &DataRequest) -> Self {
        Self::new(
            Method::Post,
            endpoints::FIND,
            serde_json::json!({ "path": path, "rq_data": data }),
        )
    }

    pub fn search(text: &str, data: &DataRequest) -> Self {
        Self::new(
            Method::Post,
            endpoints::SEARCH,
            serde_json::json!({ "text": text, "rq_data": data }),
        )
    }

    pub fn retrieve(folder_id: &str, url: &str) -> Self {
        Self::new(
            Method::Post,
            endpoints::retrieve(folder_id),
            serde_json::json!({ "url": url }),
        )
    }

    pub fn set_description(item_id: &str, description: &str) -> Self {
        Self::new(
            Method::Put,
            endpoints::description(item_id),
            serde_json::json!({ "description": description }),
        )
    }

    pub fn create_folder(parent_id: &str, name: &str) -> Self {
        Self::new(
            Method::Post,
            endpoints::folders(parent_id),
            serde_json::json!({ "name": name }),
        )
    }

    pub fn transfer(transfer: &Transfer) -> Self {
        Self::new(Method::Post, endpoints::ITEMS, transfer)
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Deserialize)]
struct ErrorEnvelope {
    code: u32,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

impl From<ErrorEnvelope> for ServiceError {
    fn from(envelope: ErrorEnvelope) -> Self {
        let message = match (envelope.error, envelope.details) {
            (Some(error), _) => error,
            (None, Some(Value::String(details))) => details,
            (None, _) => String::new(),
        };
        ServiceError::backend(envelope.code, message)
    }
}

fn error_envelope(value: &Value) -> Option<ErrorEnvelope> {
    value
        .get("code")
        .filter(|c| c.is_u64())
        .and_then(|_| ErrorEnvelope::deserialize(value).ok())
}

/// Decode the `result` of a response envelope.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ServiceError> {
    let value: Option<Value> = serde_json::from_str(body).ok();
    let success = (200..300).contains(&status);

    let Some(mut value) = value else {
        return Err(if success {
            ServiceError::Decode("response is not JSON".to_string())
        } else {
            ServiceError::Http(status)
        });
    };

    if let Some(envelope) = error_envelope(&value) {
        return Err(envelope.into());
    }
    if !success {
        return Err(ServiceError::Http(status));
    }

    let result = match value.get_mut("result") {
        Some(result) => result.take(),
        None => return Err(ServiceError::Decode("missing result".to_string())),
    };
    serde_json::from_value(result).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Check a response whose result is not needed.
pub fn decode_ack(status: u16, body: &str) -> Result<(), ServiceError> {
    decode_response::<Value>(status, body).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::DropType;

    #[test]
    fn test_folder_info_request() {
        let rq = ApiRequest::folder_info("d1", &DataRequest::new().with("core-file-modified"));
        assert_eq!(rq.method, Method::Post);
        assert_eq!(rq.path, "filesystem/d1/info/?h=1");
        assert_eq!(
            rq.body,
            Some(serde_json::json!({"data": {"core-file-modified": {}}}))
        );
    }

    #[test]
    fn test_other_requests() {
        let search = ApiRequest::search("report", &DataRequest::new());
        assert_eq!(search.body, Some(serde_json::json!({"text": "report", "rq_data": {}})));

        let desc = ApiRequest::set_description("d1", "hello");
        assert_eq!(desc.method, Method::Put);
        assert_eq!(desc.path, "filesystem/d1/description/");

        let transfer = ApiRequest::transfer(&Transfer {
            action: DropType::Copy,
            items: vec!["a".into()],
            to: "d2".into(),
        });
        assert_eq!(transfer.path, "filesystem/items/");
        assert_eq!(
            transfer.body,
            Some(serde_json::json!({"action": "copy", "items": ["a"], "to": "d2"}))
        );
    }

    #[test]
    fn test_decode_result() {
        let count: u32 = decode_response(200, r#"{"result": 3}"#).unwrap();
        assert_eq!(count, 3);
        assert!(decode_ack(200, r#"{"result": true}"#).is_ok());
    }

    #[test]
    fn test_decode_error_envelope() {
        let err = decode_response::<Value>(
            404,
            r#"{"code": 203, "error": "Directory does not exist", "details": "x"}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(203));

        let err = decode_response::<Value>(200, r#"{"code": 301, "details": "gone"}"#).unwrap_err();
        assert_eq!(err, ServiceError::backend(301, "gone"));
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(
            decode_response::<Value>(500, "<html>").unwrap_err(),
            ServiceError::Http(500)
        );
        assert!(matches!(
            decode_response::<Value>(200, "{}").unwrap_err(),
            ServiceError::Decode(_)
        ));
        assert!(matches!(
            decode_response::<u32>(200, r#"{"result": "x"}"#).unwrap_err(),
            ServiceError::Decode(_)
        ));
    }
}
