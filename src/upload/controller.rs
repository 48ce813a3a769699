use super::types::{PipelineEvent, PipelineOutcome, SelectedFile};
use super::validator::validate;
use crate::config::Config;
use crate::error::{AppError, ValidationError};
use crate::session::SessionStore;
use crate::status::{Severity, SimulatedProgress, StatusBanner, ToastQueue};
use rand::Rng;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// State of the upload view: the selection, the running job and its feedback.
pub struct UploadController {
    selected: Option<SelectedFile>,
    busy: bool,
    progress: SimulatedProgress,
    banner: Option<StatusBanner>,
    navigate_at: Option<Instant>,
    max_file_size: u64,
    error_hide_delay: Duration,
    navigate_delay: Duration,
}

impl UploadController {
    pub fn new(config: &Config) -> Self {
        Self {
            selected: None,
            busy: false,
            progress: SimulatedProgress::new(
                config.timings.progress_tick(),
                config.timings.progress_ceiling,
            ),
            banner: None,
            navigate_at: None,
            max_file_size: config.max_file_size,
            error_hide_delay: config.timings.error_hide_delay(),
            navigate_delay: config.timings.navigate_delay(),
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn banner(&self) -> Option<&StatusBanner> {
        self.banner.as_ref()
    }

    pub fn progress(&self) -> &SimulatedProgress {
        &self.progress
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.busy
    }

    /// Replaces the current selection if `file` passes validation.
    pub fn select(&mut self, file: SelectedFile, now: Instant) -> Result<(), ValidationError> {
        if self.busy {
            warn!("Ignoring selection of {} while a job is running", file.name);
            return Ok(());
        }

        match validate(&file, self.max_file_size) {
            Ok(()) => {
                info!("Selected {} ({} bytes)", file.name, file.size);
                self.selected = Some(file);
                self.banner = None;
                Ok(())
            }
            Err(e) => {
                warn!("Rejected {}: {}", file.name, e);
                self.selected = None;
                self.show_error(&AppError::Validation(e.clone()), now);
                Err(e)
            }
        }
    }

    /// Browse or drop. Of several paths, the first `.pdf` one is taken.
    pub fn select_paths(&mut self, mut paths: Vec<PathBuf>, toasts: &mut ToastQueue, now: Instant) {
        if paths.is_empty() {
            return;
        }
        if paths.len() > 1 {
            toasts.warning("Only one file can be processed at a time", now);
        }

        let chosen = paths
            .iter()
            .position(|p| p.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("pdf")))
            .unwrap_or(0);
        let first = paths.swap_remove(chosen);

        match SelectedFile::from_path(&first) {
            Ok(file) => {
                if let Err(e) = self.select(file, now) {
                    toasts.error(e.to_string(), e.suggestion().map(str::to_string), now);
                }
            }
            Err(e) => {
                warn!("Cannot read {}: {}", first.display(), e);
                self.show_error(&e, now);
            }
        }
    }

    pub fn clear(&mut self) {
        if !self.busy {
            self.selected = None;
            self.banner = None;
        }
    }

    /// Marks the job as started and hands out the file to send.
    pub fn begin_submit(&mut self, now: Instant) -> Option<SelectedFile> {
        if self.busy {
            return None;
        }
        let Some(file) = self.selected.clone() else {
            warn!("Submit requested without a selected file");
            self.show_error(&AppError::Validation(ValidationError::NoFile), now);
            return None;
        };

        self.busy = true;
        self.navigate_at = None;
        self.progress.start(now);
        self.banner = Some(
            StatusBanner::new(Severity::Info, "Uploading file...").with_subtitle(file.name.clone()),
        );
        Some(file)
    }

    pub fn on_event(
        &mut self,
        event: PipelineEvent,
        session: &mut SessionStore,
        toasts: &mut ToastQueue,
        now: Instant,
    ) {
        match event {
            PipelineEvent::Uploading { file_name } => {
                self.banner = Some(
                    StatusBanner::new(Severity::Info, "Uploading file...").with_subtitle(file_name),
                );
            }
            PipelineEvent::Extracting { upload_message, .. } => {
                let subtitle = match upload_message {
                    Some(message) => format!("{}. This can take a minute for long documents.", message),
                    None => "This can take a minute for long documents.".to_string(),
                };
                self.banner = Some(
                    StatusBanner::new(Severity::Info, "Extracting questions with AI...")
                        .with_subtitle(subtitle),
                );
            }
            PipelineEvent::Completed(outcome) => self.complete(outcome, session, toasts, now),
            PipelineEvent::Failed(e) => self.fail(&e, toasts, now),
        }
    }

    fn complete(
        &mut self,
        outcome: PipelineOutcome,
        session: &mut SessionStore,
        toasts: &mut ToastQueue,
        now: Instant,
    ) {
        session.remember_upload(&outcome.file_id, &outcome.file_name);
        self.progress.complete();

        let subtitle = match (outcome.mcq_count, outcome.message) {
            (Some(count), _) => format!("{} questions found. Opening preview...", count),
            (None, Some(message)) => format!("{}. Opening preview...", message),
            (None, None) => "Opening preview...".to_string(),
        };
        self.banner =
            Some(StatusBanner::new(Severity::Success, "Extraction complete").with_subtitle(subtitle));
        toasts.success(format!("{} processed", outcome.file_name), now);
        self.navigate_at = Some(now + self.navigate_delay);
    }

    /// Hides progress and shows the failure; the selection stays for a retry.
    pub fn fail(&mut self, err: &AppError, toasts: &mut ToastQueue, now: Instant) {
        error!("Upload failed: {}", err);
        self.busy = false;
        self.navigate_at = None;
        self.progress.hide();
        self.show_error(err, now);
        toasts.error(err.title(), err.suggestion(), now);
    }

    fn show_error(&mut self, err: &AppError, now: Instant) {
        self.banner = Some(StatusBanner::from_error(err, now, self.error_hide_delay));
    }

    /// Advances timers. Returns `true` once it is time to open the preview.
    pub fn tick<R: Rng>(&mut self, now: Instant, rng: &mut R) -> bool {
        self.progress.tick(now, rng);

        if self.banner.as_ref().map_or(false, |b| b.is_expired(now)) {
            self.banner = None;
        }

        match self.navigate_at {
            Some(at) if now >= at => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Earliest timer deadline, for repaint scheduling.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.progress.next_tick(),
            self.navigate_at,
            self.banner.as_ref().and_then(|b| b.hide_at),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn reset(&mut self) {
        self.selected = None;
        self.busy = false;
        self.navigate_at = None;
        self.banner = None;
        self.progress.hide();
    }
}
