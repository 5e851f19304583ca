//! Multipart file upload with progress reporting.
//!
//! Uses `XMLHttpRequest` because the Fetch API has no upload progress.

use js_sys::Promise;
use mollify_core::ServiceError;
use mollify_core::service::decode_ack;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

/// Form field name the backend reads files from.
const FILE_FIELD: &str = "uploader-html5[]";

/// Upload `files` to `url`, calling `on_progress(percent, bytes_per_second)`.
pub async fn upload_files(
    url: &str,
    files: &[File],
    on_progress: impl Fn(u8, f64) + 'static,
) -> Result<(), ServiceError> {
    let form = FormData::new().map_err(|_| network("cannot create form data"))?;
    for file in files {
        form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())
            .map_err(|_| network("cannot attach file"))?;
    }

    let xhr = XmlHttpRequest::new().map_err(|_| network("cannot create request"))?;
    xhr.open("POST", url).map_err(|_| network("cannot open request"))?;

    let started = js_sys::Date::now();
    let progress = Closure::<dyn Fn(ProgressEvent)>::new(move |event: ProgressEvent| {
        if !event.length_computable() || event.total() <= 0.0 {
            return;
        }
        let percent = (event.loaded() / event.total() * 100.0).floor().clamp(0.0, 100.0) as u8;
        let elapsed = (js_sys::Date::now() - started) / 1000.0;
        let speed = if elapsed > 0.0 {
            event.loaded() / elapsed
        } else {
            0.0
        };
        on_progress(percent, speed);
    });
    if let Ok(upload) = xhr.upload() {
        upload.set_onprogress(Some(progress.as_ref().unchecked_ref()));
    }

    // Settles on load, error or abort; the status is read afterwards
    let mut settle = |resolve: js_sys::Function, _reject: js_sys::Function| {
        xhr.set_onloadend(Some(&resolve));
    };
    let done = Promise::new(&mut settle);

    xhr.send_with_opt_form_data(Some(&form))
        .map_err(|_| network("cannot send request"))?;
    let _ = JsFuture::from(done).await;
    drop(progress);

    let status = xhr.status().unwrap_or(0);
    if status == 0 {
        return Err(network("upload interrupted"));
    }
    let body = xhr.response_text().ok().flatten().unwrap_or_default();
    decode_ack(status, &body)
}

fn network(message: &str) -> ServiceError {
    ServiceError::Network(message.to_string())
}
