use super::types::{PipelineEvent, PipelineOutcome, SelectedFile};
use crate::api::Backend;
use crate::error::AppResult;
use std::sync::mpsc::Sender;
use tracing::{error, info};

/// Upload then extract, strictly one after the other.
pub struct UploadPipeline<B> {
    backend: B,
}

impl<B: Backend> UploadPipeline<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Runs both steps; the first failure ends the sequence.
    pub async fn run<E>(&self, file: &SelectedFile, events: &Sender<E>) -> AppResult<PipelineOutcome>
    where
        E: From<PipelineEvent>,
    {
        events
            .send(
                PipelineEvent::Uploading {
                    file_name: file.name.clone(),
                }
                .into(),
            )
            .unwrap_or_default();

        let bytes = tokio::fs::read(&file.path).await?;
        let receipt = self.backend.upload(&file.name, bytes).await?;
        info!("Uploaded {} as {}", file.name, receipt.file_id);

        events
            .send(
                PipelineEvent::Extracting {
                    file_id: receipt.file_id.clone(),
                    upload_message: receipt.message.clone(),
                }
                .into(),
            )
            .unwrap_or_default();

        let outcome = self.backend.extract(&receipt.file_id).await?;
        if let Some(count) = outcome.count() {
            info!("Extracted {} questions from {}", count, file.name);
        }

        Ok(PipelineOutcome {
            file_id: receipt.file_id,
            file_name: file.name.clone(),
            mcq_count: outcome.count(),
            message: outcome.message,
        })
    }

    /// [`UploadPipeline::run`], reporting the end result as an event.
    pub async fn process<E>(&self, file: &SelectedFile, events: &Sender<E>)
    where
        E: From<PipelineEvent>,
    {
        let event = match self.run(file, events).await {
            Ok(outcome) => PipelineEvent::Completed(outcome),
            Err(e) => {
                error!("Processing {} failed: {}", file.name, e);
                PipelineEvent::Failed(e)
            }
        };
        events.send(event.into()).unwrap_or_default();
    }
}
