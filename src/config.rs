use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mcq_client.toml";

/// 10 MiB, the limit the backend enforces on uploads.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value '{value}' for {var}, expected {expected}")]
    InvalidValue {
        var: String,
        value: String,
        expected: &'static str,
    },
}

/// How the extract request addresses the uploaded file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// `POST /api/extract/<file_id>`
    PathParam,
    /// `POST /api/extract/process` with `{file_id}`
    BodyParam,
}

/// How the preview view retrieves extracted questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// `GET /api/extract/<file_id>`
    ExtractGet,
    /// `POST /api/extract/preview` with `{file_id}`
    PreviewPost,
}

/// Where "Download JSON" gets its bytes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonDownloadMode {
    /// Serialize the questions already shown.
    Local,
    /// Fetch the artifact the backend stored for the file.
    Remote,
}

macro_rules! impl_mode_from_str {
    ($ty:ty, $expected:literal, $($text:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    _ => Err(ConfigError::InvalidValue {
                        var: stringify!($ty).to_string(),
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

impl_mode_from_str!(ExtractMode, "path_param or body_param",
    "path_param" => ExtractMode::PathParam,
    "body_param" => ExtractMode::BodyParam,
);
impl_mode_from_str!(PreviewMode, "extract_get or preview_post",
    "extract_get" => PreviewMode::ExtractGet,
    "preview_post" => PreviewMode::PreviewPost,
);
impl_mode_from_str!(JsonDownloadMode, "local or remote",
    "local" => JsonDownloadMode::Local,
    "remote" => JsonDownloadMode::Remote,
);

/// Endpoint paths relative to the backend base URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub upload: String,
    pub extract: String,
    pub extract_process: String,
    pub preview: String,
    pub download_json: String,
    pub download_pdf: String,
    pub download_list: String,
    pub health: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            upload: "/api/upload/file".to_string(),
            extract: "/api/extract".to_string(),
            extract_process: "/api/extract/process".to_string(),
            preview: "/api/extract/preview".to_string(),
            download_json: "/api/download/json".to_string(),
            download_pdf: "/api/download/pdf".to_string(),
            download_list: "/api/download/list".to_string(),
            health: "/api/health".to_string(),
        }
    }
}

/// UI delays, all in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub error_hide_ms: u64,
    pub navigate_ms: u64,
    pub toast_ms: u64,
    pub error_toast_ms: u64,
    pub progress_tick_ms: u64,
    pub progress_ceiling: f32,
    pub request_timeout_secs: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            error_hide_ms: 8_000,
            navigate_ms: 1_500,
            toast_ms: 3_000,
            error_toast_ms: 5_000,
            progress_tick_ms: 500,
            progress_ceiling: 90.0,
            request_timeout_secs: 120,
        }
    }
}

impl Timings {
    pub fn error_hide_delay(&self) -> Duration {
        Duration::from_millis(self.error_hide_ms)
    }

    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigate_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    pub fn error_toast_duration(&self) -> Duration {
        Duration::from_millis(self.error_toast_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Client configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL, e.g. `http://localhost:5000`
    pub base_url: String,
    pub endpoints: Endpoints,
    pub extract_mode: ExtractMode,
    pub preview_mode: PreviewMode,
    pub json_download: JsonDownloadMode,
    /// Largest accepted upload in bytes
    pub max_file_size: u64,
    /// Directory downloaded artifacts are written to
    pub download_dir: PathBuf,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            endpoints: Endpoints::default(),
            extract_mode: ExtractMode::PathParam,
            preview_mode: PreviewMode::ExtractGet,
            json_download: JsonDownloadMode::Local,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            download_dir: PathBuf::from("downloads"),
            timings: Timings::default(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file (if any), then environment overrides.
    ///
    /// Never fails: a broken file or variable is skipped and returned next
    /// to the config so the caller can report it.
    pub fn load() -> (Self, Vec<ConfigError>) {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let path = std::env::var("MCQ_CLIENT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::resolve(&path, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with the file location and environment supplied.
    pub fn resolve<F>(path: &Path, lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        let mut config = if path.exists() {
            info!("Reading configuration from {}", path.display());
            Self::from_file(path).unwrap_or_else(|e| {
                errors.push(e);
                Self::default()
            })
        } else {
            Self::default()
        };

        errors.extend(config.apply_env(lookup));

        for err in &errors {
            warn!("Ignoring configuration: {}", err);
        }
        (config, errors)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Applies every valid `MCQ_*` override. Invalid ones keep the current
    /// value and are returned, one error per variable.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        if let Some(url) = lookup("MCQ_BACKEND_URL") {
            self.base_url = url;
        }
        if let Some(mode) = parse_env(&lookup, "MCQ_EXTRACT_MODE", &mut errors) {
            self.extract_mode = mode;
        }
        if let Some(mode) = parse_env(&lookup, "MCQ_PREVIEW_MODE", &mut errors) {
            self.preview_mode = mode;
        }
        if let Some(mode) = parse_env(&lookup, "MCQ_JSON_DOWNLOAD", &mut errors) {
            self.json_download = mode;
        }
        if let Some(dir) = lookup("MCQ_DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(dir);
        }
        errors
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn url_with_segment(&self, path: &str, segment: &str) -> String {
        format!(
            "{}/{}",
            self.url(path).trim_end_matches('/'),
            urlencoding::encode(segment)
        )
    }

    pub fn upload_url(&self) -> String {
        self.url(&self.endpoints.upload)
    }

    /// URL of the extract request for the configured [`ExtractMode`].
    pub fn extract_url(&self, file_id: &str) -> String {
        match self.extract_mode {
            ExtractMode::PathParam => self.url_with_segment(&self.endpoints.extract, file_id),
            ExtractMode::BodyParam => self.url(&self.endpoints.extract_process),
        }
    }

    pub fn preview_url(&self, file_id: &str) -> String {
        match self.preview_mode {
            PreviewMode::ExtractGet => self.url_with_segment(&self.endpoints.extract, file_id),
            PreviewMode::PreviewPost => self.url(&self.endpoints.preview),
        }
    }

    pub fn download_json_url(&self, file_id: &str) -> String {
        self.url_with_segment(&self.endpoints.download_json, file_id)
    }

    pub fn download_pdf_url(&self) -> String {
        self.url(&self.endpoints.download_pdf)
    }

    pub fn list_url(&self) -> String {
        self.url(&self.endpoints.download_list)
    }

    pub fn health_url(&self) -> String {
        self.url(&self.endpoints.health)
    }
}

/// Parses `key` if set, naming the variable in the error.
fn parse_env<T, F>(lookup: &F, key: &str, errors: &mut Vec<ConfigError>) -> Option<T>
where
    T: FromStr<Err = ConfigError>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key)?.parse() {
        Ok(value) => Some(value),
        Err(ConfigError::InvalidValue {
            value, expected, ..
        }) => {
            errors.push(ConfigError::InvalidValue {
                var: key.to_string(),
                value,
                expected,
            });
            None
        }
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractMode::PathParam => write!(f, "path_param"),
            ExtractMode::BodyParam => write!(f, "body_param"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_backend_contract() {
        let config = Config::default();
        assert_eq!(config.max_file_size, 10_485_760);
        assert_eq!(config.timings.error_hide_delay(), Duration::from_secs(8));
        assert_eq!(config.timings.navigate_delay(), Duration::from_millis(1500));
        assert_eq!(config.timings.progress_ceiling, 90.0);
        assert_eq!(config.upload_url(), "http://localhost:5000/api/upload/file");
        assert_eq!(config.health_url(), "http://localhost:5000/api/health");
    }

    #[test]
    fn extract_url_follows_mode() {
        let mut config = Config::default();
        assert_eq!(
            config.extract_url("abc-123"),
            "http://localhost:5000/api/extract/abc-123"
        );

        config.extract_mode = ExtractMode::BodyParam;
        assert_eq!(
            config.extract_url("abc-123"),
            "http://localhost:5000/api/extract/process"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_not_doubled() {
        let config = Config {
            base_url: "https://mcq.example.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.download_json_url("f 1"),
            "https://mcq.example.com/api/download/json/f%201"
        );
        assert_eq!(config.list_url(), "https://mcq.example.com/api/download/list");
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let config: Config = toml::from_str(
            r#"
            base_url = "http://10.0.0.5:8080"
            preview_mode = "preview_post"

            [timings]
            error_hide_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:8080");
        assert_eq!(config.preview_mode, PreviewMode::PreviewPost);
        assert_eq!(config.extract_mode, ExtractMode::PathParam);
        assert_eq!(config.timings.error_hide_ms, 5000);
        assert_eq!(config.timings.toast_ms, 3000);
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn env_overrides_are_applied() {
        let env: HashMap<&str, &str> = [
            ("MCQ_BACKEND_URL", "https://api.example.org"),
            ("MCQ_EXTRACT_MODE", "Body_Param"),
            ("MCQ_JSON_DOWNLOAD", "remote"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        let errors = config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert!(errors.is_empty());

        assert_eq!(config.base_url, "https://api.example.org");
        assert_eq!(config.extract_mode, ExtractMode::BodyParam);
        assert_eq!(config.json_download, JsonDownloadMode::Remote);
        assert_eq!(config.preview_mode, PreviewMode::ExtractGet);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut config = Config::default();
        let errors =
            config.apply_env(|key| (key == "MCQ_PREVIEW_MODE").then(|| "sideways".to_string()));

        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConfigError::InvalidValue { var, value, .. } => {
                assert_eq!(var, "MCQ_PREVIEW_MODE");
                assert_eq!(value, "sideways");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(config.preview_mode, PreviewMode::ExtractGet);
    }

    #[test]
    fn bad_variable_keeps_the_other_overrides() {
        let env: HashMap<&str, &str> = [
            ("MCQ_BACKEND_URL", "http://192.168.1.20:5000"),
            ("MCQ_EXTRACT_MODE", "query_param"),
            ("MCQ_JSON_DOWNLOAD", "remote"),
            ("MCQ_DOWNLOAD_DIR", "/tmp/mcqs"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        let errors = config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(errors.len(), 1);
        assert_eq!(config.base_url, "http://192.168.1.20:5000");
        assert_eq!(config.extract_mode, ExtractMode::PathParam);
        assert_eq!(config.json_download, JsonDownloadMode::Remote);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/mcqs"));
    }

    #[test]
    fn broken_file_still_takes_env_overrides() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "base_url = [not toml").unwrap();

        let (config, errors) = Config::resolve(&path, |key| {
            (key == "MCQ_BACKEND_URL").then(|| "http://10.1.1.1:5000".to_string())
        });

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
        assert_eq!(config.base_url, "http://10.1.1.1:5000");
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn missing_file_means_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let (config, errors) = Config::resolve(&temp.path().join("absent.toml"), |_| None);
        assert!(errors.is_empty());
        assert_eq!(config.base_url, "http://localhost:5000");
    }
}
