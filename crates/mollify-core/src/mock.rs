//! In-memory [`FilesystemService`] for tests.

use std::collections::HashMap;
use std::future::ready;
use std::sync::Mutex;

use crate::dnd::Transfer;
use crate::error::ServiceError;
use crate::models::{DataRequest, FilesystemItem, FolderInfo, Permissions, SearchResult};
use crate::service::{FilesystemService, ServiceFuture};

/// Canned responses plus a log of every call made.
#[derive(Default)]
pub struct MockService {
    folders: HashMap<String, Result<FolderInfo, ServiceError>>,
    paths: HashMap<String, Result<FolderInfo, ServiceError>>,
    searches: HashMap<String, SearchResult>,
    failures: HashMap<&'static str, ServiceError>,
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<DataRequest>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, info: FolderInfo) -> Self {
        self.folders.insert(info.folder.id.clone(), Ok(info));
        self
    }

    pub fn with_folder_error(mut self, id: &str, error: ServiceError) -> Self {
        self.folders.insert(id.to_string(), Err(error));
        self
    }

    pub fn with_path(mut self, path: &str, result: Result<FolderInfo, ServiceError>) -> Self {
        self.paths.insert(path.to_string(), result);
        self
    }

    pub fn with_search(mut self, text: &str, result: SearchResult) -> Self {
        self.searches.insert(text.to_string(), result);
        self
    }

    /// Make a mutation (`retrieve`, `description`, `create_folder`,
    /// `transfer`) fail.
    pub fn failing(mut self, operation: &'static str, error: ServiceError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Calls made so far, e.g. `folder_info:r1`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Data requests sent with listings.
    pub fn data_requests(&self) -> Vec<DataRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, call: String, data: Option<&DataRequest>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if let (Some(data), Ok(mut requests)) = (data, self.requests.lock()) {
            requests.push(data.clone());
        }
    }

    fn mutation(&self, operation: &'static str, call: String) -> ServiceFuture<'_, ()> {
        self.record(call, None);
        let result = match self.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        };
        Box::pin(ready(result))
    }
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::backend(crate::error::codes::FOLDER_NOT_FOUND, format!("{} not found", id))
}

impl FilesystemService for MockService {
    fn folder_info<'a>(
        &'a self,
        folder_id: &'a str,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderInfo> {
        self.record(format!("folder_info:{}", folder_id), Some(data));
        let result = self
            .folders
            .get(folder_id)
            .cloned()
            .unwrap_or_else(|| Err(not_found(folder_id)));
        Box::pin(ready(result))
    }

    fn find_folder<'a>(
        &'a self,
        path: &'a str,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderInfo> {
        self.record(format!("find_folder:{}", path), Some(data));
        let result = self
            .paths
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(not_found(path)));
        Box::pin(ready(result))
    }

    fn search<'a>(&'a self, text: &'a str, data: &'a DataRequest) -> ServiceFuture<'a, SearchResult> {
        self.record(format!("search:{}", text), Some(data));
        let result = self.searches.get(text).cloned().unwrap_or_default();
        Box::pin(ready(Ok(result)))
    }

    fn retrieve<'a>(&'a self, folder_id: &'a str, url: &'a str) -> ServiceFuture<'a, ()> {
        self.mutation("retrieve", format!("retrieve:{}:{}", folder_id, url))
    }

    fn set_description<'a>(
        &'a self,
        folder_id: &'a str,
        description: &'a str,
    ) -> ServiceFuture<'a, ()> {
        self.mutation(
            "description",
            format!("description:{}:{}", folder_id, description),
        )
    }

    fn create_folder<'a>(&'a self, parent_id: &'a str, name: &'a str) -> ServiceFuture<'a, ()> {
        self.mutation("create_folder", format!("create_folder:{}:{}", parent_id, name))
    }

    fn transfer<'a>(&'a self, transfer: &'a Transfer) -> ServiceFuture<'a, ()> {
        let action = match transfer.action {
            crate::dnd::DropType::Copy => "copy",
            crate::dnd::DropType::Move => "move",
        };
        self.mutation(
            "transfer",
            format!("transfer:{}:{}:{}", action, transfer.items.join(","), transfer.to),
        )
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Listing of `folder` with the given children and read-write access.
pub fn folder_info(folder: FilesystemItem, children: Vec<FilesystemItem>) -> FolderInfo {
    let (folders, files): (Vec<_>, Vec<_>) = children.into_iter().partition(|c| c.is_folder());
    FolderInfo {
        hierarchy: vec![folder.clone()],
        folder,
        folders,
        files,
        permissions: Permissions::new().with(crate::models::ITEM_ACCESS, "rw"),
        data: Default::default(),
    }
}
