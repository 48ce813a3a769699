mod client;
mod response;

pub use client::{ApiClient, Backend};
pub use response::{interpret, ExtractOutcome, HealthStatus, UploadReceipt};
