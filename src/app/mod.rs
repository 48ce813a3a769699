mod preview_ui;
mod state;
mod ui;

use crate::api::ApiClient;
use crate::config::{ConfigError, JsonDownloadMode};
use crate::error::AppError;
use crate::upload::UploadPipeline;
use eframe::{egui, App};
pub use state::{AppEvent, AppState, BackendStatus, Page, Task};
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

/// How often the window repaints while a toast is fading.
const ANIMATION_FRAME: Duration = Duration::from_millis(50);

pub struct McqExtractorApp {
    api: ApiClient,
    ctx: egui::Context,
    state: AppState,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
}

impl McqExtractorApp {
    /// `config_errors` are settings that were skipped while loading; each
    /// becomes a warning toast on the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        api: ApiClient,
        config_errors: Vec<ConfigError>,
    ) -> Self {
        info!("Starting MCQ Extractor against {}", api.config().base_url);
        let (events_tx, events_rx) = channel();
        let mut app = Self {
            state: AppState::new(api.config()),
            ctx: cc.egui_ctx.clone(),
            api,
            events_tx,
            events_rx,
        };
        app.state.report_config_errors(config_errors, Instant::now());
        app.check_health();
        app
    }

    /// Runs `job` on its own thread with a fresh tokio runtime.
    fn spawn<F, Fut>(&self, task: Task, job: F)
    where
        F: FnOnce(ApiClient, Sender<AppEvent>) -> Fut + Send + 'static,
        Fut: Future<Output = ()>,
    {
        let api = self.api.clone();
        let sender = self.events_tx.clone();
        let ctx = self.ctx.clone();

        std::thread::spawn(move || {
            match Runtime::new() {
                Ok(rt) => rt.block_on(job(api, sender)),
                Err(e) => {
                    error!("Could not start runtime for {:?}: {}", task, e);
                    sender
                        .send(AppEvent::TaskAborted {
                            task,
                            message: format!("Could not start background task: {}", e),
                        })
                        .unwrap_or_default();
                }
            }
            ctx.request_repaint();
        });
    }

    pub fn start_upload(&mut self) {
        let Some(file) = self.state.upload.begin_submit(Instant::now()) else {
            return;
        };
        info!("Starting upload of {}", file.name);

        self.spawn(Task::Upload, move |api, sender| async move {
            UploadPipeline::new(api).process(&file, &sender).await;
        });
    }

    pub fn navigate(&mut self, page: Page) {
        info!("Navigating to {:?}", page);
        match page {
            Page::Upload => self.state.page = Page::Upload,
            Page::Preview => self.load_preview(),
        }
    }

    /// Enters the preview page and fetches the questions for the stored id.
    pub fn load_preview(&mut self) {
        self.state.page = Page::Preview;
        let Some(file_id) = self.state.preview.enter(&self.state.session) else {
            return;
        };

        self.spawn(Task::Preview, move |api, sender| async move {
            let result = api.preview(&file_id).await;
            sender
                .send(AppEvent::PreviewLoaded { file_id, result })
                .unwrap_or_default();
        });
        self.refresh_server_files();
    }

    pub fn download_json(&mut self) {
        let Some(file_id) = self.state.preview.upload().map(|u| u.file_id.clone()) else {
            return;
        };
        if !self
            .state
            .preview
            .begin_download("JSON", &mut self.state.toasts, Instant::now())
        {
            return;
        }

        match self.state.preview.json_download() {
            JsonDownloadMode::Local => {
                let result = self.state.preview.save_local_json();
                self.state
                    .preview
                    .on_downloaded(result, &mut self.state.toasts, Instant::now());
            }
            JsonDownloadMode::Remote => {
                let fallback = self.state.preview.remote_json_fallback_name();
                let dir = self.state.preview.download_dir().to_path_buf();

                self.spawn(Task::Download, move |api, sender| async move {
                    let event = match api.json_exists(&file_id).await {
                        Ok(true) => {
                            AppEvent::Downloaded(api.download_json(&file_id, &fallback, &dir).await)
                        }
                        Ok(false) => AppEvent::RemoteJsonMissing,
                        Err(e) => AppEvent::Downloaded(Err(e)),
                    };
                    sender.send(event).unwrap_or_default();
                });
            }
        }
    }

    pub fn download_pdf(&mut self) {
        let Some(file_id) = self.state.preview.upload().map(|u| u.file_id.clone()) else {
            return;
        };
        if !self
            .state
            .preview
            .begin_download("PDF", &mut self.state.toasts, Instant::now())
        {
            return;
        }

        let name = self.state.preview.pdf_file_name();
        let dir: PathBuf = self.state.preview.download_dir().to_path_buf();
        self.spawn(Task::Download, move |api, sender| async move {
            let result = api.download_pdf(&file_id, &name, &dir).await;
            sender.send(AppEvent::Downloaded(result)).unwrap_or_default();
        });
    }

    pub fn refresh_server_files(&mut self) {
        self.spawn(Task::FileList, |api, sender| async move {
            let result = api.list_files().await;
            sender.send(AppEvent::FileList(result)).unwrap_or_default();
        });
    }

    pub fn check_health(&mut self) {
        self.state.backend = BackendStatus::Checking;
        self.spawn(Task::Health, |api, sender| async move {
            let result = api.health().await;
            sender.send(AppEvent::Health(result)).unwrap_or_default();
        });
    }

    fn handle_event(&mut self, event: AppEvent, now: Instant) {
        let state = &mut self.state;
        match event {
            AppEvent::Pipeline(event) => {
                state
                    .upload
                    .on_event(event, &mut state.session, &mut state.toasts, now)
            }
            AppEvent::PreviewLoaded { file_id, result } => {
                state
                    .preview
                    .on_loaded(&file_id, result, &mut state.toasts, now)
            }
            AppEvent::Downloaded(result) => state.preview.on_downloaded(result, &mut state.toasts, now),
            AppEvent::RemoteJsonMissing => {
                warn!("No JSON artifact on the server, saving the local copy");
                state
                    .toasts
                    .warning("Server copy not found. Saving the questions shown instead.", now);
                let result = state.preview.save_local_json();
                state.preview.on_downloaded(result, &mut state.toasts, now);
            }
            AppEvent::FileList(result) => state.preview.on_file_list(result, &mut state.toasts, now),
            AppEvent::Health(Ok(health)) => {
                info!("Backend online: {}", health.label());
                state.backend = BackendStatus::Online(health.label());
            }
            AppEvent::Health(Err(e)) => {
                warn!("Backend health check failed: {}", e);
                state.backend = BackendStatus::Offline(e.user_message());
            }
            AppEvent::TaskAborted { task, message } => {
                let err = AppError::application(message);
                match task {
                    Task::Upload => state.upload.fail(&err, &mut state.toasts, now),
                    Task::Preview => {
                        let file_id = state
                            .preview
                            .upload()
                            .map(|u| u.file_id.clone())
                            .unwrap_or_default();
                        state
                            .preview
                            .on_loaded(&file_id, Err(err), &mut state.toasts, now)
                    }
                    Task::Download => state.preview.on_downloaded(Err(err), &mut state.toasts, now),
                    Task::FileList => state.preview.on_file_list(Err(err), &mut state.toasts, now),
                    Task::Health => state.backend = BackendStatus::Offline(err.user_message()),
                }
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event, now);
        }

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() && self.state.page == Page::Upload {
            self.state
                .upload
                .select_paths(dropped, &mut self.state.toasts, now);
        }

        if self.state.upload.tick(now, &mut self.state.rng) {
            self.navigate(Page::Preview);
        }
        self.state.toasts.prune(now);

        if !self.state.toasts.is_empty() {
            ctx.request_repaint_after(ANIMATION_FRAME);
        } else if let Some(deadline) = self.state.upload.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl App for McqExtractorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
