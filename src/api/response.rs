use crate::error::{AppError, AppResult};
use crate::mcq::{mcqs_from_value, Mcq};
use crate::utils::suggestion::suggest_for_status;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

fn text_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Turns a raw response into JSON or the most specific error available.
///
/// Unparsable bodies are transport failures. A parsed body is an
/// application failure when the status is not 2xx, `status` is `"error"`,
/// `success` is `false` or an `error` field is present.
pub fn interpret(endpoint: &str, status: StatusCode, body: &str) -> AppResult<Value> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let (message, code) = if status.is_success() {
            ("The server returned an unreadable response.".to_string(), None)
        } else {
            (
                format!("Request failed with status {}", status),
                Some(status.as_u16()),
            )
        };
        return Err(AppError::Network {
            endpoint: endpoint.to_string(),
            message,
            status: code,
        });
    };

    let message = text_field(&value, "message");
    let error = text_field(&value, "error");
    let suggestion = text_field(&value, "suggestion");

    let reports_error = text_field(&value, "status").map_or(false, |s| s.eq_ignore_ascii_case("error"))
        || value.get("success").and_then(Value::as_bool) == Some(false)
        || error.is_some();

    if !status.is_success() || reports_error {
        let detail = message.or(error);
        let suggestion = match (suggestion, detail) {
            (Some(hint), _) => Some(hint.to_string()),
            (None, None) => Some(suggest_for_status(status.as_u16()).to_string()),
            (None, Some(_)) => None,
        };
        return Err(AppError::Application {
            message: detail
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status)),
            suggestion,
            status: Some(status.as_u16()),
        });
    }

    Ok(value)
}

/// Server answer to an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_id: String,
    pub message: Option<String>,
}

impl UploadReceipt {
    pub fn from_value(value: &Value) -> AppResult<Self> {
        let file_id = text_field(value, "file_id")
            .ok_or_else(|| AppError::application("Upload response did not include a file identifier."))?;

        Ok(Self {
            file_id: file_id.to_string(),
            message: text_field(value, "message").map(str::to_string),
        })
    }
}

/// Server answer to an extract request; `mcqs` is `None` for a bare
/// acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub mcqs: Option<Vec<Mcq>>,
    pub message: Option<String>,
}

impl ExtractOutcome {
    pub fn from_value(value: &Value) -> AppResult<Self> {
        let mcqs = mcqs_from_value(value).map_err(|e| {
            AppError::application(format!("Could not read extracted questions: {}", e))
        })?;

        Ok(Self {
            mcqs,
            message: text_field(value, "message").map(str::to_string),
        })
    }

    pub fn count(&self) -> Option<usize> {
        self.mcqs.as_ref().map(Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    pub service: Option<String>,
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn label(&self) -> String {
        match (&self.service, &self.version) {
            (Some(service), Some(version)) => format!("{} {}", service, version),
            (Some(service), None) => service.clone(),
            _ if self.status.is_empty() => "online".to_string(),
            _ => self.status.clone(),
        }
    }
}
