use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Every failure of the download helper, as one human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DownloadError {
    pub message: String,
}

impl DownloadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new("Download timed out. Please check your connection and try again.")
        } else if err.is_connect() {
            Self::new("Could not reach the server: connection failed.")
        } else {
            Self::new(format!("Download request failed: {}", err))
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        });

        match detail {
            Some(detail) => Self::new(format!("Download failed ({}): {}", status.as_u16(), detail)),
            None => Self::new(format!("Download failed with status {}", status)),
        }
    }
}

/// Body and server-chosen name of a fetched artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

/// Artifacts the backend currently stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub json_files: Vec<String>,
    #[serde(default)]
    pub pdf_files: Vec<String>,
}

#[derive(Deserialize)]
struct ListResponse {
    data: Option<FileListing>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct DownloadHelper {
    http: reqwest::Client,
    list_url: String,
}

impl DownloadHelper {
    pub fn new(http: reqwest::Client, list_url: impl Into<String>) -> Self {
        Self {
            http,
            list_url: list_url.into(),
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url)
    }

    pub fn post_json(&self, url: &str, body: &Value) -> RequestBuilder {
        self.http.post(url).json(body)
    }

    pub async fn fetch(&self, request: RequestBuilder) -> Result<DownloadedFile, DownloadError> {
        let response = request.send().await.map_err(DownloadError::request)?;
        let status = response.status();
        debug!("Download response {} from {}", status, response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DownloadError::from_status(status, &body));
        }

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_disposition);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::new(format!("Failed to read download: {}", e)))?;

        Ok(DownloadedFile {
            bytes: bytes.to_vec(),
            filename,
        })
    }

    /// GETs `url` and writes it into `dir`, preferring the server's filename.
    pub async fn fetch_and_save(
        &self,
        url: &str,
        suggested_name: &str,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        self.fetch_request_and_save(self.get(url), suggested_name, dir)
            .await
    }

    pub async fn fetch_request_and_save(
        &self,
        request: RequestBuilder,
        suggested_name: &str,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let file = self.fetch(request).await?;
        let name = file.filename.as_deref().unwrap_or(suggested_name);
        save_bytes(&file.bytes, name, dir)
    }

    /// HEAD check; a 404 is a plain `false`.
    pub async fn exists(&self, url: &str) -> Result<bool, DownloadError> {
        let response = self
            .http
            .head(url)
            .send()
            .await
            .map_err(DownloadError::request)?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(DownloadError::new(format!(
                "Could not check file availability (status {})",
                status
            ))),
        }
    }

    pub async fn list_files(&self) -> Result<FileListing, DownloadError> {
        let response = self
            .http
            .get(&self.list_url)
            .send()
            .await
            .map_err(DownloadError::request)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::new(format!("Failed to read file list: {}", e)))?;

        if !status.is_success() {
            return Err(DownloadError::from_status(status, &body));
        }

        let parsed: ListResponse = serde_json::from_str(&body)
            .map_err(|e| DownloadError::new(format!("Unexpected file list response: {}", e)))?;

        match parsed.data {
            Some(listing) => Ok(listing),
            None => Err(DownloadError::new(
                parsed
                    .message
                    .or(parsed.error)
                    .unwrap_or_else(|| "File list response had no data".to_string()),
            )),
        }
    }
}

/// Filename from a `Content-Disposition` header. `filename*` (RFC 5987)
/// beats `filename`.
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;

    for part in header.split(';').map(str::trim) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');

        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.split_once("''").map_or(value, |(_, rest)| rest);
                if let Some(name) = urlencoding::decode(encoded)
                    .ok()
                    .and_then(|decoded| sanitize_filename(&decoded))
                {
                    return Some(name);
                }
            }
            "filename" => plain = sanitize_filename(value),
            _ => {}
        }
    }

    plain
}

/// Last path component with control characters removed.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => None,
        _ => Some(cleaned.to_string()),
    }
}

pub fn save_bytes(bytes: &[u8], filename: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
    let name = sanitize_filename(filename)
        .ok_or_else(|| DownloadError::new(format!("Invalid file name: '{}'", filename)))?;

    fs::create_dir_all(dir).map_err(|e| {
        warn!("Cannot create download directory {}: {}", dir.display(), e);
        DownloadError::new(format!("Cannot create folder {}: {}", dir.display(), e))
    })?;

    let path = dir.join(name);
    fs::write(&path, bytes)
        .map_err(|e| DownloadError::new(format!("Cannot write {}: {}", path.display(), e)))?;

    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn content_disposition_variants() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="mcqs_abc.json""#).as_deref(),
            Some("mcqs_abc.json")
        );
        assert_eq!(
            parse_content_disposition("attachment; filename=plain.json").as_deref(),
            Some("plain.json")
        );
        assert_eq!(
            parse_content_disposition(
                r#"attachment; filename="fallback.json"; filename*=UTF-8''r%C3%A9sum%C3%A9.json"#
            )
            .as_deref(),
            Some("résumé.json")
        );
        assert_eq!(parse_content_disposition("inline"), None);
        assert_eq!(parse_content_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn header_cannot_escape_download_dir() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="../../etc/passwd""#).as_deref(),
            Some("passwd")
        );
        assert_eq!(sanitize_filename(r"C:\temp\out.pdf").as_deref(), Some("out.pdf"));
        assert_eq!(sanitize_filename(".."), None);
    }

    #[test]
    fn save_bytes_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("downloads");

        let path = save_bytes(b"[]", "mcqs.json", &dir).unwrap();

        assert_eq!(path, dir.join("mcqs.json"));
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn save_bytes_rejects_empty_name() {
        let temp = TempDir::new().unwrap();
        let err = save_bytes(b"x", "  ", temp.path()).unwrap_err();
        assert!(err.message.contains("Invalid file name"));
    }

    #[test]
    fn status_errors_use_body_message() {
        let err = DownloadError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"error": "File not found: x.json", "status_code": 404}"#,
        );
        assert_eq!(err.message, "Download failed (404): File not found: x.json");

        let err = DownloadError::from_status(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.message, "Download failed with status 502 Bad Gateway");
    }

    #[test]
    fn listing_tolerates_missing_collections() {
        let parsed: ListResponse =
            serde_json::from_str(r#"{"success": true, "data": {"json_files": ["a.json"]}}"#)
                .unwrap();
        let listing = parsed.data.unwrap();
        assert_eq!(listing.json_files, vec!["a.json".to_string()]);
        assert!(listing.pdf_files.is_empty());
    }
}
