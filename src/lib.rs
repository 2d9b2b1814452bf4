//! Transcriptify upload form, compiled to WebAssembly.
//!
//! Renders a single form that uploads a meeting transcript PDF to the
//! summarization service and downloads the returned summary as
//! `meeting_summary.pdf`. See [`assembly::mount`] for the JavaScript entry
//! point.

mod assembly;
mod controller;
mod dom;
mod download;
mod fetch;
mod file_utils;
mod logging;
mod schema;
mod state;

pub use assembly::{UploadFormHandle, mount, start, version};
pub use controller::{DownloadSink, FormView, SummaryService, UploadForm};
pub use schema::{FormOptions, ServiceReply, UploadError};
pub use state::{PdfFile, UploadState};
