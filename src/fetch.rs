//! Multipart upload through `window.fetch`.

use crate::controller::SummaryService;
use crate::schema::{FILE_FIELD, ServiceReply, UploadError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

/// Posts the selected file to the summarization endpoint.
///
/// There is no timeout and no way to cancel: the returned future settles only
/// when the browser does.
pub struct FetchService {
    endpoint: String,
}

impl FetchService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    async fn post(&self, file: &File) -> Result<ServiceReply, JsValue> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&multipart(file)?.into());
        let request = Request::new_with_str_and_init(&self.endpoint, &init)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        read_reply(&response).await
    }
}

/// Multipart body with the file as its only part.
fn multipart(file: &File) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())?;
    Ok(form)
}

/// Status line of `response`, plus its body when the status is a success.
async fn read_reply(response: &Response) -> Result<ServiceReply, JsValue> {
    let body = if response.ok() {
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        js_sys::Uint8Array::new(&buffer).to_vec()
    } else {
        Vec::new()
    };

    Ok(ServiceReply {
        status: response.status(),
        status_text: response.status_text(),
        body,
    })
}

impl SummaryService for FetchService {
    type File = File;

    async fn summarize(&self, file: &File) -> Result<ServiceReply, UploadError> {
        log::debug!("POST {}", self.endpoint);
        self.post(file)
            .await
            .map_err(|e| UploadError::Network(js_error_message(&e)))
    }
}

/// Best-effort message of a thrown JS value; empty when it has none.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return err.message().into();
    }
    value.as_string().unwrap_or_default()
}
