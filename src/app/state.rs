use crate::api::HealthStatus;
use crate::config::{Config, ConfigError};
use crate::download::FileListing;
use crate::error::{AppError, AppResult};
use crate::mcq::Mcq;
use crate::preview::PreviewController;
use crate::session::SessionStore;
use crate::status::{Severity, ToastQueue};
use crate::upload::{PipelineEvent, UploadController};
use derivative::Derivative;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Upload,
    Preview,
}

/// Which kind of background job a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Upload,
    Preview,
    Download,
    FileList,
    Health,
}

/// Everything a background thread can report to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    Pipeline(PipelineEvent),
    /// Questions for `file_id`; dropped if the preview has moved on.
    PreviewLoaded {
        file_id: String,
        result: AppResult<Vec<Mcq>>,
    },
    Downloaded(AppResult<PathBuf>),
    /// The backend has no JSON artifact; the local copy is saved instead.
    RemoteJsonMissing,
    FileList(AppResult<FileListing>),
    Health(AppResult<HealthStatus>),
    /// The worker thread could not start its runtime.
    TaskAborted { task: Task, message: String },
}

impl From<PipelineEvent> for AppEvent {
    fn from(event: PipelineEvent) -> Self {
        AppEvent::Pipeline(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Checking,
    Online(String),
    Offline(String),
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct AppState {
    pub page: Page,
    pub session: SessionStore,
    pub toasts: ToastQueue,
    pub backend: BackendStatus,
    #[derivative(Debug = "ignore")]
    pub upload: UploadController,
    #[derivative(Debug = "ignore")]
    pub preview: PreviewController,
    #[derivative(Debug = "ignore")]
    pub rng: StdRng,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            page: Page::Upload,
            session: SessionStore::new(),
            toasts: ToastQueue::new(
                config.timings.toast_duration(),
                config.timings.error_toast_duration(),
            ),
            backend: BackendStatus::Unknown,
            upload: UploadController::new(config),
            preview: PreviewController::new(config),
            rng: StdRng::from_entropy(),
        }
    }

    /// One warning toast per setting that was ignored at startup.
    pub fn report_config_errors(&mut self, errors: Vec<ConfigError>, now: Instant) {
        for err in errors.into_iter().map(AppError::from) {
            self.toasts.push(
                Severity::Warning,
                err.title(),
                Some(format!("{}. {}", err.user_message(), CONFIG_HINT)),
                now,
            );
        }
    }
}

const CONFIG_HINT: &str = "Defaults are used instead.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_events_convert() {
        let event: AppEvent = PipelineEvent::Extracting {
            file_id: "x".into(),
            upload_message: None,
        }
        .into();
        assert!(matches!(
            event,
            AppEvent::Pipeline(PipelineEvent::Extracting { .. })
        ));
    }

    #[test]
    fn config_errors_become_warnings() {
        let mut state = AppState::new(&Config::default());
        let errors = Config::default().apply_env(|key| match key {
            "MCQ_EXTRACT_MODE" => Some("sideways".to_string()),
            _ => None,
        });

        state.report_config_errors(errors, Instant::now());

        let toast = state.toasts.iter().next().unwrap();
        assert_eq!(toast.severity, Severity::Warning);
        assert_eq!(toast.title, "Configuration error");
        assert!(toast.subtitle.as_deref().unwrap().contains("MCQ_EXTRACT_MODE"));
    }

    #[test]
    fn starts_on_upload_page() {
        let state = AppState::new(&Config::default());
        assert_eq!(state.page, Page::Upload);
        assert_eq!(state.backend, BackendStatus::Unknown);
        assert!(state.toasts.is_empty());
        assert!(!state.upload.can_submit());
    }
}
