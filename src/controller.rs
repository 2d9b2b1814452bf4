//! # Upload form controller
//!
//! Drives the select/submit flow of the form against three seams:
//!
//! - [`SummaryService`] posts the PDF and returns the raw reply
//! - [`DownloadSink`] hands the summary bytes to the user
//! - [`FormView`] renders the state after every transition
//!
//! The browser implementations live in `fetch`, `download` and `dom`.
//! Submission has a single await point (the service call); the state is never
//! borrowed across it, so handlers stay re-entrant.

use crate::file_utils::{format_bytes, has_pdf_extension, has_pdf_magic};
use crate::schema::{DOWNLOAD_FILENAME, ServiceReply, UploadError};
use crate::state::{PdfFile, UploadState};
use std::cell::RefCell;
use std::rc::Rc;

/// State shared between the form's event handlers.
pub type SharedState<F> = Rc<RefCell<UploadState<F>>>;

/// Sends a transcript to the summarization service.
#[allow(async_fn_in_trait)]
pub trait SummaryService {
    type File: PdfFile;

    /// Posts `file` as multipart form data. Transport failures are errors;
    /// HTTP error statuses are returned as a reply.
    async fn summarize(&self, file: &Self::File) -> Result<ServiceReply, UploadError>;
}

/// Saves the summary for the user.
pub trait DownloadSink {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<(), UploadError>;
}

/// Reflects the state on screen.
pub trait FormView<F> {
    fn render(&self, state: &UploadState<F>);
}

pub struct UploadForm<S: SummaryService, D, V> {
    state: SharedState<S::File>,
    service: S,
    sink: D,
    view: V,
}

impl<S, D, V> UploadForm<S, D, V>
where
    S: SummaryService,
    D: DownloadSink,
    V: FormView<S::File>,
{
    pub fn new(service: S, sink: D, view: V) -> Self {
        Self::with_state(Rc::default(), service, sink, view)
    }

    pub fn with_state(state: SharedState<S::File>, service: S, sink: D, view: V) -> Self {
        let form = Self {
            state,
            service,
            sink,
            view,
        };
        form.render();
        form
    }

    pub fn state(&self) -> &SharedState<S::File> {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn select_file(&self, file: Option<S::File>) {
        match &file {
            Some(f) => {
                log::info!("selected {} ({})", f.name(), format_bytes(f.size()));
                if !has_pdf_extension(&f.name()) {
                    log::warn!("{} has no .pdf extension; uploading anyway", f.name());
                }
            }
            None => log::debug!("file selection cleared"),
        }
        self.state.borrow_mut().select_file(file);
        self.render();
    }

    /// Runs one submission to completion.
    ///
    /// Whatever the outcome, the form is idle again when this returns and the
    /// error region reflects the result.
    pub async fn submit(&self) -> Result<(), UploadError> {
        let begun = self.state.borrow_mut().begin_submit();
        let file = match begun {
            Ok(file) => file,
            Err(err) => {
                log::warn!("submit rejected: {err}");
                self.render();
                return Err(err);
            }
        };
        self.render();

        log::info!("uploading {} ({})", file.name(), format_bytes(file.size()));
        let outcome = self.transmit(&file).await;

        self.state.borrow_mut().settle(&outcome);
        self.render();

        if let Err(err) = &outcome {
            log::warn!("summary failed: {err}");
        }
        outcome
    }

    async fn transmit(&self, file: &S::File) -> Result<(), UploadError> {
        let reply = self.service.summarize(file).await?;
        if !reply.is_success() {
            return Err(UploadError::Http {
                status: reply.status,
                status_text: reply.status_text,
            });
        }

        let size = format_bytes(reply.body.len() as u64);
        if !has_pdf_magic(&reply.body) {
            log::warn!("service returned a non-PDF body ({size}); saving it as-is");
        }
        self.sink.save(&reply.body, DOWNLOAD_FILENAME)?;
        log::info!("saved {DOWNLOAD_FILENAME} ({size})");
        Ok(())
    }

    fn render(&self) {
        self.view.render(&self.state.borrow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MISSING_FILE_MESSAGE;
    use crate::state::tests::MemFile;
    use futures::executor::block_on;
    use std::cell::Cell;

    const SUMMARY: &[u8] = b"%PDF-1.3\n1 0 obj << /Type /Pages /Count 1 >>";

    /// Replies with queued answers and records what the form looked like
    /// while each request was in flight.
    #[derive(Default)]
    struct FakeService {
        state: Option<SharedState<MemFile>>,
        replies: RefCell<Vec<Result<ServiceReply, UploadError>>>,
        uploads: RefCell<Vec<String>>,
        disabled_in_flight: RefCell<Vec<bool>>,
    }

    impl FakeService {
        fn replying(
            state: &SharedState<MemFile>,
            replies: Vec<Result<ServiceReply, UploadError>>,
        ) -> Self {
            Self {
                state: Some(state.clone()),
                replies: RefCell::new(replies.into_iter().rev().collect()),
                ..Default::default()
            }
        }
    }

    impl SummaryService for &FakeService {
        type File = MemFile;

        async fn summarize(&self, file: &MemFile) -> Result<ServiceReply, UploadError> {
            self.uploads.borrow_mut().push(file.name.clone());
            if let Some(state) = &self.state {
                self.disabled_in_flight
                    .borrow_mut()
                    .push(state.borrow().submit_disabled());
            }
            self.replies
                .borrow_mut()
                .pop()
                .expect("unexpected request")
        }
    }

    #[derive(Default)]
    struct FakeSink {
        saved: RefCell<Vec<(String, Vec<u8>)>>,
        fail: Cell<bool>,
    }

    impl DownloadSink for &FakeSink {
        fn save(&self, bytes: &[u8], filename: &str) -> Result<(), UploadError> {
            if self.fail.get() {
                return Err(UploadError::Download(String::new()));
            }
            self.saved.borrow_mut().push((filename.into(), bytes.to_vec()));
            Ok(())
        }
    }

    /// Remembers (disabled, caption, error) for every render.
    #[derive(Default)]
    struct RecordingView {
        frames: RefCell<Vec<(bool, &'static str, Option<String>)>>,
    }

    impl FormView<MemFile> for &RecordingView {
        fn render(&self, state: &UploadState<MemFile>) {
            self.frames.borrow_mut().push((
                state.submit_disabled(),
                state.submit_caption(),
                state.error_message.clone(),
            ));
        }
    }

    fn ok(body: &[u8]) -> Result<ServiceReply, UploadError> {
        Ok(ServiceReply {
            status: 200,
            status_text: "OK".into(),
            body: body.to_vec(),
        })
    }

    fn pdf() -> MemFile {
        MemFile::new("standup.pdf", b"%PDF-1.7 transcript")
    }

    #[test]
    fn test_submit_without_file_skips_network() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(&state, vec![]);
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state.clone(), &service, &sink, &view);

        let result = block_on(form.submit());

        assert_eq!(result, Err(UploadError::MissingFile));
        assert!(service.uploads.borrow().is_empty());
        assert!(sink.saved.borrow().is_empty());
        assert_eq!(state.borrow().error_message.as_deref(), Some(MISSING_FILE_MESSAGE));
        let frames = view.frames.borrow();
        assert_eq!(frames.last().unwrap().2.as_deref(), Some(MISSING_FILE_MESSAGE));
        assert!(frames.iter().all(|(disabled, _, _)| !disabled));
    }

    #[test]
    fn test_selecting_file_clears_error() {
        let service = FakeService::default();
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::new(&service, &sink, &view);

        let _ = block_on(form.submit());
        assert!(form.state().borrow().error_message.is_some());

        form.select_file(Some(pdf()));
        assert_eq!(form.state().borrow().error_message, None);
        assert_eq!(view.frames.borrow().last().unwrap().2, None);
    }

    #[test]
    fn test_success_downloads_once() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(&state, vec![ok(SUMMARY)]);
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state.clone(), &service, &sink, &view);

        form.select_file(Some(pdf()));
        assert_eq!(block_on(form.submit()), Ok(()));

        assert_eq!(*service.uploads.borrow(), vec!["standup.pdf".to_string()]);
        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "meeting_summary.pdf");
        assert_eq!(saved[0].1, SUMMARY);
        assert_eq!(state.borrow().error_message, None);
        assert!(!state.borrow().is_submitting);
    }

    #[test]
    fn test_http_failure_surfaces_status_text() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(
            &state,
            vec![Ok(ServiceReply {
                status: 500,
                status_text: "Internal Server Error".into(),
                body: vec![],
            })],
        );
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state.clone(), &service, &sink, &view);

        form.select_file(Some(pdf()));
        let result = block_on(form.submit());

        assert!(matches!(result, Err(UploadError::Http { status: 500, .. })));
        assert!(sink.saved.borrow().is_empty());
        assert_eq!(
            state.borrow().error_message.as_deref(),
            Some("Internal Server Error")
        );
        assert!(!state.borrow().is_submitting);
    }

    #[test]
    fn test_button_disabled_for_whole_flight() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(
            &state,
            vec![
                ok(SUMMARY),
                Err(UploadError::Network("Failed to fetch".into())),
            ],
        );
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state.clone(), &service, &sink, &view);
        form.select_file(Some(pdf()));

        view.frames.borrow_mut().clear();
        block_on(form.submit()).unwrap();
        let err = block_on(form.submit()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch");

        assert_eq!(*service.disabled_in_flight.borrow(), vec![true, true]);
        let frames = view.frames.borrow();
        assert_eq!(
            *frames,
            vec![
                (true, "Generating Summary...", None),
                (false, "Generate Summary", None),
                (true, "Generating Summary...", None),
                (false, "Generate Summary", Some("Failed to fetch".to_string())),
            ]
        );
    }

    #[test]
    fn test_two_submissions_two_downloads() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(&state, vec![ok(b"%PDF first"), ok(b"%PDF second")]);
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state.clone(), &service, &sink, &view);

        form.select_file(Some(MemFile::new("monday.pdf", b"%PDF")));
        block_on(form.submit()).unwrap();
        form.select_file(Some(MemFile::new("tuesday.pdf", b"%PDF")));
        block_on(form.submit()).unwrap();

        assert_eq!(
            *service.uploads.borrow(),
            vec!["monday.pdf".to_string(), "tuesday.pdf".to_string()]
        );
        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|(name, _)| name == "meeting_summary.pdf"));
        assert_eq!(saved[1].1, b"%PDF second");
    }

    #[test]
    fn test_non_pdf_body_still_saved() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(&state, vec![ok(b"plain text summary")]);
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state, &service, &sink, &view);

        form.select_file(Some(pdf()));
        assert_eq!(block_on(form.submit()), Ok(()));
        assert_eq!(sink.saved.borrow()[0].1, b"plain text summary");
    }

    #[test]
    fn test_binary_summary_saved_byte_for_byte() {
        let mut body = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec();
        body.extend((0..=255u8).cycle().take(3 * 1024 * 1024));
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(&state, vec![ok(&body)]);
        let sink = FakeSink::default();
        let view = RecordingView::default();
        let form = UploadForm::with_state(state, &service, &sink, &view);

        form.select_file(Some(pdf()));
        assert_eq!(block_on(form.submit()), Ok(()));
        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].1, body);
    }

    #[test]
    fn test_download_failure_uses_generic_message() {
        let state: SharedState<MemFile> = Rc::default();
        let service = FakeService::replying(&state, vec![ok(SUMMARY)]);
        let sink = FakeSink::default();
        sink.fail.set(true);
        let view = RecordingView::default();
        let form = UploadForm::with_state(state.clone(), &service, &sink, &view);

        form.select_file(Some(pdf()));
        assert!(block_on(form.submit()).is_err());
        assert_eq!(
            state.borrow().error_message.as_deref(),
            Some("Something went wrong!")
        );
        assert!(!state.borrow().is_submitting);
    }
}
