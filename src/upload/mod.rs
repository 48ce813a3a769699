mod controller;
mod pipeline;
mod types;
mod validator;

pub use controller::UploadController;
pub use pipeline::UploadPipeline;
pub use types::{PipelineEvent, PipelineOutcome, SelectedFile};
pub use validator::{is_pdf, validate};

pub const PDF_MIME: &str = "application/pdf";
