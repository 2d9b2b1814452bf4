//! Saving the summary through a synthesized anchor click.

use crate::controller::DownloadSink;
use crate::fetch::js_error_message;
use crate::file_utils::PDF_MIME;
use crate::schema::UploadError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

/// Triggers the browser's download of an in-memory PDF.
pub struct BrowserDownload;

/// A `blob:` URL, revoked when dropped.
struct ObjectUrl(String);

impl ObjectUrl {
    fn for_blob(blob: &Blob) -> Result<Self, JsValue> {
        Url::create_object_url_with_blob(blob).map(Self)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(e) = Url::revoke_object_url(&self.0) {
            log::warn!("could not revoke {}: {}", self.0, js_error_message(&e));
        }
    }
}

impl BrowserDownload {
    fn trigger(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let bag = BlobPropertyBag::new();
        bag.set_type(PDF_MIME);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)?;

        let url = ObjectUrl::for_blob(&blob)?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let link = anchor(&document, &url.0, filename)?;
        body.append_child(&link)?;
        link.click();
        link.remove();
        Ok(())
    }
}

fn anchor(document: &Document, href: &str, filename: &str) -> Result<HtmlAnchorElement, JsValue> {
    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(href);
    link.set_download(filename);
    Ok(link)
}

impl DownloadSink for BrowserDownload {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<(), UploadError> {
        Self::trigger(bytes, filename).map_err(|e| UploadError::Download(js_error_message(&e)))
    }
}
