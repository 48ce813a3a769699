use crate::config::ConfigError;
use crate::download::DownloadError;
use crate::utils::file_size::format_size;
use crate::utils::suggestion::{suggest, suggest_for_status, CONNECTION_HINT, GENERIC_HINT};
use thiserror::Error;

/// Local checks on a selected file, raised before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file selected. Please select a PDF file.")]
    NoFile,
    #[error("Invalid file type. Only PDF files are allowed.")]
    InvalidType { name: String, mime: String },
    #[error("File too large ({}). Maximum size is {}.", size_label(.size), size_label(.limit))]
    TooLarge { size: u64, limit: u64 },
}

fn size_label(bytes: &u64) -> String {
    format_size(*bytes)
}

impl ValidationError {
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ValidationError::NoFile => None,
            ValidationError::InvalidType { .. } => Some("Please choose a .pdf document."),
            ValidationError::TooLarge { .. } => {
                Some("Compress the PDF or split it into smaller files and try again.")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never produced a usable response.
    #[error("{message}")]
    Network {
        endpoint: String,
        message: String,
        status: Option<u16>,
    },

    /// The server answered and said no.
    #[error("{message}")]
    Application {
        message: String,
        suggestion: Option<String>,
        status: Option<u16>,
    },

    #[error("Could not copy to clipboard: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wraps a transport failure from `reqwest`.
    pub fn network(endpoint: impl Into<String>, err: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        let message = if err.is_timeout() {
            "The request timed out before the server responded.".to_string()
        } else if err.is_connect() {
            format!("Connection to the server failed ({}).", endpoint)
        } else {
            format!("Network error: {}", err)
        };

        AppError::Network {
            endpoint,
            message,
            status: err.status().map(|s| s.as_u16()),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        AppError::Application {
            message: message.into(),
            suggestion: None,
            status: None,
        }
    }

    /// Short heading for banners and toasts.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Invalid file",
            AppError::Network { .. } => "Connection problem",
            AppError::Application { .. } => "Request failed",
            AppError::Clipboard(_) => "Copy failed",
            AppError::Download(_) => "Download failed",
            AppError::Config(_) => "Configuration error",
            AppError::Io(_) => "File error",
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Server-supplied hint first, keyword-derived otherwise.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            AppError::Validation(e) => e.suggestion().map(str::to_string),
            AppError::Application {
                message,
                suggestion,
                ..
            } => Some(
                suggestion
                    .clone()
                    .unwrap_or_else(|| suggest(message).to_string()),
            ),
            AppError::Network {
                status: Some(code), ..
            } => Some(suggest_for_status(*code).to_string()),
            AppError::Network { message, .. } => {
                let hint = match suggest(message) {
                    GENERIC_HINT => CONNECTION_HINT,
                    hint => hint,
                };
                Some(hint.to_string())
            }
            AppError::Download(e) => Some(suggest(&e.message).to_string()),
            AppError::Clipboard(_) | AppError::Config(_) | AppError::Io(_) => None,
        }
    }
}
