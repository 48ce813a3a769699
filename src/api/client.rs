use super::response::{interpret, ExtractOutcome, HealthStatus, UploadReceipt};
use crate::config::{Config, ExtractMode, PreviewMode};
use crate::download::{DownloadHelper, FileListing};
use crate::error::{AppError, AppResult};
use crate::mcq::{mcqs_from_value, Mcq};
use crate::upload::PDF_MIME;
use crate::utils::logging::truncate_text;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The two calls the upload sequence needs.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<UploadReceipt>;
    async fn extract(&self, file_id: &str) -> AppResult<ExtractOutcome>;
}

/// HTTP client for the extraction backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timings.request_timeout())
            .build()
            .map_err(|e| AppError::network(config.base_url.clone(), e))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn downloads(&self) -> DownloadHelper {
        DownloadHelper::new(self.http.clone(), self.config.list_url())
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> AppResult<Value> {
        debug!("Sending request to {}", url);
        let response = request
            .send()
            .await
            .map_err(|e| AppError::network(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(url, e))?;

        debug!("{} from {}: {}", status, url, truncate_text(&body, 200));
        interpret(url, status, &body)
    }

    /// Questions for an already extracted file.
    pub async fn preview(&self, file_id: &str) -> AppResult<Vec<Mcq>> {
        let url = self.config.preview_url(file_id);
        let request = match self.config.preview_mode {
            PreviewMode::ExtractGet => self.http.get(&url),
            PreviewMode::PreviewPost => self.http.post(&url).json(&json!({ "file_id": file_id })),
        };

        let value = self.send(&url, request).await?;
        let mcqs = mcqs_from_value(&value)
            .map_err(|e| AppError::application(format!("Could not read extracted questions: {}", e)))?
            .ok_or_else(|| AppError::application("No questions were returned for this file."))?;

        info!("Loaded {} questions for {}", mcqs.len(), file_id);
        Ok(mcqs)
    }

    /// Server-side JSON artifact, saved under the name the server suggests.
    pub async fn download_json(
        &self,
        file_id: &str,
        fallback_name: &str,
        dir: &Path,
    ) -> AppResult<PathBuf> {
        let url = self.config.download_json_url(file_id);
        Ok(self.downloads().fetch_and_save(&url, fallback_name, dir).await?)
    }

    /// Whether the backend kept a JSON artifact for `file_id`.
    pub async fn json_exists(&self, file_id: &str) -> AppResult<bool> {
        let url = self.config.download_json_url(file_id);
        Ok(self.downloads().exists(&url).await?)
    }

    pub async fn download_pdf(
        &self,
        file_id: &str,
        suggested_name: &str,
        dir: &Path,
    ) -> AppResult<PathBuf> {
        let downloads = self.downloads();
        let request = downloads.post_json(
            &self.config.download_pdf_url(),
            &json!({ "file_id": file_id }),
        );
        Ok(downloads
            .fetch_request_and_save(request, suggested_name, dir)
            .await?)
    }

    pub async fn list_files(&self) -> AppResult<FileListing> {
        Ok(self.downloads().list_files().await?)
    }

    pub async fn health(&self) -> AppResult<HealthStatus> {
        let url = self.config.health_url();
        let value = self.send(&url, self.http.get(&url)).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::application(format!("Unexpected health response: {}", e)))
    }
}

impl Backend for ApiClient {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<UploadReceipt> {
        let url = self.config.upload_url();
        info!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_MIME)
            .map_err(|e| AppError::network(url.as_str(), e))?;
        let form = Form::new().part("file", part);

        let value = self.send(&url, self.http.post(&url).multipart(form)).await?;
        UploadReceipt::from_value(&value)
    }

    async fn extract(&self, file_id: &str) -> AppResult<ExtractOutcome> {
        let url = self.config.extract_url(file_id);
        info!("Requesting extraction for {} ({})", file_id, self.config.extract_mode);

        let request = match self.config.extract_mode {
            ExtractMode::PathParam => self.http.post(&url),
            ExtractMode::BodyParam => self.http.post(&url).json(&json!({ "file_id": file_id })),
        };

        let value = self.send(&url, request).await?;
        ExtractOutcome::from_value(&value)
    }
}
