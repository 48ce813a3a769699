use super::clipboard::ClipboardSink;
use crate::config::{Config, JsonDownloadMode};
use crate::download::{save_bytes, FileListing};
use crate::error::{AppError, AppResult};
use crate::mcq::{to_pretty_json, Mcq};
use crate::session::{CurrentUpload, SessionStore};
use crate::status::{Severity, ToastQueue};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

pub const NO_FILE_MESSAGE: &str = "No file selected. Please upload a PDF first.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    /// Nothing in the session to show. Stays until the user uploads again.
    MissingFile,
    Loading,
    Loaded,
    Failed {
        message: String,
        suggestion: Option<String>,
    },
}

pub struct PreviewController {
    state: PreviewState,
    upload: Option<CurrentUpload>,
    mcqs: Vec<Mcq>,
    json_download: JsonDownloadMode,
    download_dir: PathBuf,
    server_files: Option<FileListing>,
    downloading: bool,
}

impl PreviewController {
    pub fn new(config: &Config) -> Self {
        Self {
            state: PreviewState::Idle,
            upload: None,
            mcqs: Vec::new(),
            json_download: config.json_download,
            download_dir: config.download_dir.clone(),
            server_files: None,
            downloading: false,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn mcqs(&self) -> &[Mcq] {
        &self.mcqs
    }

    pub fn upload(&self) -> Option<&CurrentUpload> {
        self.upload.as_ref()
    }

    pub fn json_download(&self) -> JsonDownloadMode {
        self.json_download
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn server_files(&self) -> Option<&FileListing> {
        self.server_files.as_ref()
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    /// Reads the session and returns the id to fetch, if there is one.
    pub fn enter(&mut self, session: &SessionStore) -> Option<String> {
        self.mcqs.clear();

        match session.current_upload() {
            Some(upload) => {
                info!("Opening preview for {}", upload.file_id);
                let file_id = upload.file_id.clone();
                self.upload = Some(upload);
                self.state = PreviewState::Loading;
                Some(file_id)
            }
            None => {
                warn!("Preview opened without an uploaded file");
                self.upload = None;
                self.state = PreviewState::MissingFile;
                None
            }
        }
    }

    /// Applies a fetch result, unless it belongs to an earlier visit.
    pub fn on_loaded(
        &mut self,
        file_id: &str,
        result: AppResult<Vec<Mcq>>,
        toasts: &mut ToastQueue,
        now: Instant,
    ) {
        if self.state != PreviewState::Loading || self.file_id() != file_id {
            warn!(
                "Dropping stale questions for {} (showing {:?})",
                file_id,
                self.upload.as_ref().map(|u| u.file_id.as_str())
            );
            return;
        }

        match result {
            Ok(mcqs) => {
                info!("Showing {} questions", mcqs.len());
                if mcqs.is_empty() {
                    toasts.warning("No questions were found in this document", now);
                }
                self.mcqs = mcqs;
                self.state = PreviewState::Loaded;
            }
            Err(e) => {
                error!("Failed to load questions: {}", e);
                toasts.error(e.title(), e.suggestion(), now);
                self.state = PreviewState::Failed {
                    message: e.user_message(),
                    suggestion: e.suggestion(),
                };
            }
        }
    }

    /// Never fails past this call; problems end up as toasts.
    pub fn copy_json<C: ClipboardSink>(&self, sink: &mut C, toasts: &mut ToastQueue, now: Instant) {
        let copied = to_pretty_json(&self.mcqs)
            .map_err(|e| AppError::Clipboard(e.to_string()))
            .and_then(|json| sink.write_text(&json));

        match copied {
            Ok(()) => {
                info!("Copied {} questions to the clipboard", self.mcqs.len());
                toasts.success("Copied to clipboard", now);
            }
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                toasts.error("Failed to copy to clipboard", Some(e.user_message()), now);
            }
        }
    }

    fn file_id(&self) -> &str {
        self.upload.as_ref().map_or("", |u| u.file_id.as_str())
    }

    fn file_stem(&self) -> Option<&str> {
        let name = self.upload.as_ref()?.file_name.as_deref()?;
        Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }

    /// `<stem>_mcqs.json`, or the server's default name when the stem is unknown.
    pub fn json_file_name(&self) -> String {
        match self.file_stem() {
            Some(stem) => format!("{}_mcqs.json", stem),
            None => self.remote_json_fallback_name(),
        }
    }

    pub fn remote_json_fallback_name(&self) -> String {
        format!("mcqs_{}.json", self.file_id())
    }

    pub fn pdf_file_name(&self) -> String {
        self.upload
            .as_ref()
            .and_then(|u| u.file_name.clone())
            .unwrap_or_else(|| format!("{}.pdf", self.file_id()))
    }

    /// Writes the questions on screen into the download folder.
    pub fn save_local_json(&self) -> AppResult<PathBuf> {
        let json = to_pretty_json(&self.mcqs)
            .map_err(|e| AppError::application(format!("Could not serialize questions: {}", e)))?;
        Ok(save_bytes(json.as_bytes(), &self.json_file_name(), &self.download_dir)?)
    }

    /// Claims the single download slot and announces `what` is on its way.
    pub fn begin_download(&mut self, what: &str, toasts: &mut ToastQueue, now: Instant) -> bool {
        if self.downloading || self.upload.is_none() {
            return false;
        }
        self.downloading = true;
        toasts.info(format!("Downloading {}...", what), now);
        true
    }

    pub fn on_downloaded(&mut self, result: AppResult<PathBuf>, toasts: &mut ToastQueue, now: Instant) {
        self.downloading = false;
        match result {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                toasts.push(
                    Severity::Success,
                    format!("Saved {}", name),
                    Some(path.display().to_string()),
                    now,
                );
            }
            Err(e) => {
                error!("Download failed: {}", e);
                toasts.error(e.user_message(), e.suggestion(), now);
            }
        }
    }

    pub fn on_file_list(&mut self, result: AppResult<FileListing>, toasts: &mut ToastQueue, now: Instant) {
        match result {
            Ok(listing) => {
                info!(
                    "Server holds {} JSON and {} PDF files",
                    listing.json_files.len(),
                    listing.pdf_files.len()
                );
                self.server_files = Some(listing);
            }
            Err(e) => {
                warn!("Could not list server files: {}", e);
                toasts.error("Could not load server files", Some(e.user_message()), now);
            }
        }
    }
}
