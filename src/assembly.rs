//! # Assembly Module
//!
//! The WASM-exported surface of the upload form. It wires the browser
//! adapters (`FetchService`, `BrowserDownload`, `DomView`) into an
//! `UploadForm` and attaches it to the page.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount } from './pkg/transcriptify_wasm.js';
//!
//! await init();
//! const form = mount("app", JSON.stringify({ log_level: "debug" }));
//! // ...
//! form.unmount();
//! ```

use crate::controller::UploadForm;
use crate::dom::DomView;
use crate::download::BrowserDownload;
use crate::fetch::FetchService;
use crate::logging;
use crate::schema::{FormOptions, UploadError};
use crate::state::PdfFile;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Event;

type BrowserForm = UploadForm<FetchService, BrowserDownload, DomView>;

impl From<UploadError> for JsValue {
    fn from(err: UploadError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Installs the panic hook and the console logger when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Returns the crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Mounts the upload form inside the element with id `root_id`.
///
/// # Parameters
///
/// * `root_id` - Id of an existing element the form is appended to.
/// * `options_json` - Optional JSON object with `endpoint` and `log_level`.
///   Missing fields take their defaults; unknown fields are rejected.
///
/// # Errors
///
/// Throws a string if the options are invalid, the root element is missing or
/// the markup cannot be built.
#[wasm_bindgen]
pub fn mount(root_id: &str, options_json: Option<String>) -> Result<UploadFormHandle, JsValue> {
    let options = FormOptions::from_json(options_json.as_deref())?;
    logging::init(options.level_filter()?);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let root = document
        .get_element_by_id(root_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {root_id:?}")))?;

    let view = DomView::build(&document, &root)?;
    let form = Rc::new(UploadForm::new(
        FetchService::new(options.endpoint.clone()),
        BrowserDownload,
        view,
    ));

    let on_change = {
        let form = Rc::clone(&form);
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            form.select_file(form.view().chosen_file());
        })
    };
    let on_submit = {
        let form = Rc::clone(&form);
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let form = Rc::clone(&form);
            wasm_bindgen_futures::spawn_local(async move {
                // the outcome is already rendered and logged
                let _ = form.submit().await;
            });
        })
    };

    let view = form.view();
    view.input
        .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    view.form
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;

    log::info!("mounted upload form in #{} posting to {}", root_id, options.endpoint);

    Ok(UploadFormHandle {
        form: Some(form),
        on_change,
        on_submit,
    })
}

/// Handle to a mounted form. Freeing it unmounts the form.
#[wasm_bindgen]
pub struct UploadFormHandle {
    form: Option<Rc<BrowserForm>>,
    on_change: Closure<dyn FnMut(Event)>,
    on_submit: Closure<dyn FnMut(Event)>,
}

#[wasm_bindgen]
impl UploadFormHandle {
    /// Whether a request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.form
            .as_ref()
            .is_some_and(|f| f.state().borrow().is_submitting)
    }

    /// Message currently shown in the error region.
    pub fn error_message(&self) -> Option<String> {
        self.form
            .as_ref()
            .and_then(|f| f.state().borrow().error_message.clone())
    }

    /// Name of the selected file.
    pub fn selected_file_name(&self) -> Option<String> {
        self.form
            .as_ref()
            .and_then(|f| f.state().borrow().selected_file.as_ref().map(PdfFile::name))
    }

    /// Detaches listeners, removes the markup and drops the form state.
    ///
    /// A submission already in flight still completes, but its result is
    /// rendered into detached elements.
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        let Some(form) = self.form.take() else {
            return Ok(());
        };
        let view = form.view();
        view.input.remove_event_listener_with_callback(
            "change",
            self.on_change.as_ref().unchecked_ref(),
        )?;
        view.form.remove_event_listener_with_callback(
            "submit",
            self.on_submit.as_ref().unchecked_ref(),
        )?;
        view.remove();
        log::info!("unmounted upload form");
        Ok(())
    }
}

impl Drop for UploadFormHandle {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            log::warn!("unmount on drop failed: {}", crate::fetch::js_error_message(&e));
        }
    }
}
