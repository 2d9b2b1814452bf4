//! Markup of the upload form and rendering of its state.

use crate::controller::FormView;
use crate::file_utils::PDF_MIME;
use crate::state::UploadState;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
};

pub const FILE_INPUT_ID: &str = "pdfFile";

/// The elements of a mounted form.
pub struct DomView {
    pub container: Element,
    pub form: HtmlFormElement,
    pub input: HtmlInputElement,
    pub button: HtmlButtonElement,
    pub error: HtmlElement,
}

impl DomView {
    /// Builds the form and appends it to `root`.
    pub fn build(document: &Document, root: &Element) -> Result<Self, JsValue> {
        let container = document.create_element("div")?;
        container.set_class_name("w-full mx-auto p-6");

        let title = document.create_element("h1")?;
        title.set_class_name("text-3xl font-bold mb-6 text-center");
        title.set_text_content(Some("Transcriptify"));
        container.append_child(&title)?;

        let form: HtmlFormElement = document.create_element("form")?.dyn_into()?;
        form.set_class_name("space-y-4");

        let field = document.create_element("div")?;
        let label = document.create_element("label")?;
        label.set_attribute("for", FILE_INPUT_ID)?;
        label.set_class_name("block mb-2 font-semibold text-center");
        label.set_text_content(Some("Upload PDF File"));
        field.append_child(&label)?;

        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        input.set_type("file");
        input.set_id(FILE_INPUT_ID);
        input.set_required(true);
        input.set_accept(PDF_MIME);
        input.set_class_name(
            "block text-sm text-gray-900 border border-gray-300 rounded-md cursor-pointer mx-auto",
        );
        field.append_child(&input)?;
        form.append_child(&field)?;

        let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
        button.set_type("submit");
        button.set_class_name(concat!(
            "bg-gray-600 text-white py-2 rounded-md ",
            "hover:bg-black disabled:opacity-50 block mx-auto",
        ));
        form.append_child(&button)?;
        container.append_child(&form)?;

        let error: HtmlElement = document.create_element("p")?.dyn_into()?;
        error.set_class_name("mt-4 text-red-600 font-semibold");
        error.set_hidden(true);
        container.append_child(&error)?;

        root.append_child(&container)?;

        Ok(Self {
            container,
            form,
            input,
            button,
            error,
        })
    }

    /// First file of the picker, if any.
    pub fn chosen_file(&self) -> Option<web_sys::File> {
        self.input.files().and_then(|files| files.get(0))
    }

    pub fn remove(&self) {
        self.container.remove();
    }
}

impl<F> FormView<F> for DomView {
    fn render(&self, state: &UploadState<F>) {
        self.button.set_disabled(state.submit_disabled());
        self.button.set_text_content(Some(state.submit_caption()));

        match &state.error_message {
            Some(message) => {
                self.error.set_text_content(Some(message.as_str()));
                self.error.set_hidden(false);
            }
            None => {
                self.error.set_text_content(None);
                self.error.set_hidden(true);
            }
        }
    }
}
