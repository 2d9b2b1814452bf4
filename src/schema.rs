//! Data structures and types for the upload form.
//!
//! This module defines the error taxonomy surfaced to the user, the options
//! accepted by `mount`, and the fixed names used on the wire.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default summarization endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://transcript-summeriser-tool.onrender.com/summarize/";

/// Multipart field carrying the uploaded PDF.
pub const FILE_FIELD: &str = "file";

/// Name given to the downloaded summary.
pub const DOWNLOAD_FILENAME: &str = "meeting_summary.pdf";

/// Shown when submitting without a selected file.
pub const MISSING_FILE_MESSAGE: &str = "Please upload a PDF file.";

/// Fallback when a thrown error carries no message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong!";

/// Errors that can occur while submitting a transcript.
///
/// The `Display` output of every variant is the exact text rendered in the
/// form's error region.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Submit was triggered with no file selected.
    #[error("{}", MISSING_FILE_MESSAGE)]
    MissingFile,
    /// The service answered with a non-success status.
    ///
    /// Renders as the status text. A blank status text (browsers report none
    /// over HTTP/2) renders as `Request failed with status <code>` instead.
    #[error("{}", status_message(.status, .status_text))]
    Http { status: u16, status_text: String },
    /// The request could not be sent or its body could not be read.
    #[error("{}", or_generic(.0))]
    Network(String),
    /// The response could not be handed to the browser as a download.
    #[error("{}", or_generic(.0))]
    Download(String),
    /// Options passed to `mount` were rejected.
    #[error("invalid options: {0}")]
    Config(String),
}

fn status_message(status: &u16, status_text: &str) -> String {
    if status_text.trim().is_empty() {
        // HTTP/2 responses carry no reason phrase
        format!("Request failed with status {status}")
    } else {
        status_text.to_string()
    }
}

fn or_generic(message: &str) -> &str {
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE
    } else {
        message
    }
}

/// Status line and body of a summarization response.
///
/// `body` is only read for success statuses; failed responses carry an empty
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Configuration options accepted by `mount`.
///
/// All fields are optional. The JSON form mirrors the struct:
///
/// ```json
/// { "endpoint": "http://localhost:10000/summarize/", "log_level": "debug" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormOptions {
    /// Absolute http(s) URL the PDF is posted to.
    pub endpoint: String,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            log_level: "info".into(),
        }
    }
}

impl FormOptions {
    /// Parses and validates options. `None` or blank input yields the defaults.
    pub fn from_json(options_json: Option<&str>) -> Result<Self, UploadError> {
        let options: FormOptions = match options_json.map(str::trim) {
            Some(s) if !s.is_empty() => {
                serde_json::from_str(s).map_err(|e| UploadError::Config(e.to_string()))?
            }
            _ => FormOptions::default(),
        };
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<(), UploadError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| UploadError::Config(format!("endpoint {:?}: {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UploadError::Config(format!(
                "endpoint must use http or https, got {}",
                url.scheme()
            )));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, UploadError> {
        self.log_level
            .parse()
            .map_err(|_| UploadError::Config(format!("unknown log level {:?}", self.log_level)))
    }
}
