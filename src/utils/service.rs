//! HTTP implementation of the filesystem service.

use mollify_core::service::{ApiRequest, decode_ack, decode_response};
use mollify_core::{
    DataRequest, FilesystemService, FolderInfo, SearchResult, ServiceError, ServiceFuture,
    Transfer,
};
use serde::de::DeserializeOwned;

use super::fetch::send;

/// Talks to the Mollify REST backend at `base_url`.
#[derive(Clone, Debug)]
pub struct HttpService {
    base_url: String,
}

impl HttpService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Absolute URL for a service path (uploads, thumbnails).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ServiceError> {
        let response = send(&self.base_url, &request).await?;
        decode_response(response.status, &response.body)
    }

    async fn ack(&self, request: ApiRequest) -> Result<(), ServiceError> {
        let response = send(&self.base_url, &request).await?;
        decode_ack(response.status, &response.body)
    }
}

impl FilesystemService for HttpService {
    fn folder_info<'a>(
        &'a self,
        folder_id: &'a str,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderInfo> {
        Box::pin(self.call(ApiRequest::folder_info(folder_id, data)))
    }

    fn find_folder<'a>(
        &'a self,
        path: &'a str,
        data: &'a DataRequest,
    ) -> ServiceFuture<'a, FolderInfo> {
        Box::pin(self.call(ApiRequest::find_folder(path, data)))
    }

    fn search<'a>(&'a self, text: &'a str, data: &'a DataRequest) -> ServiceFuture<'a, SearchResult> {
        Box::pin(self.call(ApiRequest::search(text, data)))
    }

    fn retrieve<'a>(&'a self, folder_id: &'a str, url: &'a str) -> ServiceFuture<'a, ()> {
        Box::pin(self.ack(ApiRequest::retrieve(folder_id, url)))
    }

    fn set_description<'a>(
        &'a self,
        folder_id: &'a str,
        description: &'a str,
    ) -> ServiceFuture<'a, ()> {
        Box::pin(self.ack(ApiRequest::set_description(folder_id, description)))
    }

    fn create_folder<'a>(&'a self, parent_id: &'a str, name: &'a str) -> ServiceFuture<'a, ()> {
        Box::pin(self.ack(ApiRequest::create_folder(parent_id, name)))
    }

    fn transfer<'a>(&'a self, transfer: &'a Transfer) -> ServiceFuture<'a, ()> {
        Box::pin(self.ack(ApiRequest::transfer(transfer)))
    }
}
