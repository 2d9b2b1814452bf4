//! Transient state of the upload form.

use crate::schema::UploadError;

/// Caption of the submit button while idle.
pub const IDLE_CAPTION: &str = "Generate Summary";

/// Caption of the submit button while a request is outstanding.
pub const BUSY_CAPTION: &str = "Generating Summary...";

/// A file handle the form can hold and upload.
pub trait PdfFile: Clone {
    fn name(&self) -> String;
    fn size(&self) -> u64;
}

impl PdfFile for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn size(&self) -> u64 {
        // Blob sizes are whole, non-negative byte counts carried as f64
        web_sys::Blob::size(self).max(0.0) as u64
    }
}

/// State of one mounted form: idle or submitting, plus the current selection
/// and error.
#[derive(Debug, Clone)]
pub struct UploadState<F> {
    pub selected_file: Option<F>,
    pub is_submitting: bool,
    pub error_message: Option<String>,
}

impl<F> Default for UploadState<F> {
    fn default() -> Self {
        Self {
            selected_file: None,
            is_submitting: false,
            error_message: None,
        }
    }
}

impl<F> UploadState<F> {
    pub fn submit_caption(&self) -> &'static str {
        if self.is_submitting { BUSY_CAPTION } else { IDLE_CAPTION }
    }

    pub fn submit_disabled(&self) -> bool {
        self.is_submitting
    }
}

impl<F: PdfFile> UploadState<F> {
    /// Replaces the selection and clears any displayed error.
    pub fn select_file(&mut self, file: Option<F>) {
        self.selected_file = file;
        self.error_message = None;
    }

    /// Enters the submitting state, returning the file to upload.
    ///
    /// Without a selection the missing-file message is set and the state
    /// stays idle.
    pub fn begin_submit(&mut self) -> Result<F, UploadError> {
        let Some(file) = self.selected_file.clone() else {
            self.error_message = Some(UploadError::MissingFile.to_string());
            return Err(UploadError::MissingFile);
        };
        self.is_submitting = true;
        self.error_message = None;
        Ok(file)
    }

    /// Returns to idle after a submission, recording a failure if any.
    pub fn settle<T>(&mut self, outcome: &Result<T, UploadError>) {
        self.is_submitting = false;
        self.error_message = outcome.as_ref().err().map(ToString::to_string);
    }
}
