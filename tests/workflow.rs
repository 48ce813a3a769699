use mcq_extractor::api::{Backend, ExtractOutcome, UploadReceipt};
use mcq_extractor::config::{Config, ExtractMode, JsonDownloadMode};
use mcq_extractor::error::{AppError, AppResult, ValidationError};
use mcq_extractor::mcq::{from_json, to_pretty_json, AnswerKey, Mcq};
use mcq_extractor::preview::{PreviewController, PreviewState};
use mcq_extractor::session::SessionStore;
use mcq_extractor::status::ToastQueue;
use mcq_extractor::upload::{validate, PipelineEvent, SelectedFile, UploadController, UploadPipeline};
use mcq_extractor::utils::suggestion::{suggest, API_KEY_HINT, OCR_HINT};
use std::fs;
use std::sync::mpsc::channel;
use std::sync::Mutex;
use std::time::Instant;
use tempfile::TempDir;

struct RecordingBackend {
    extracted: Mutex<Option<String>>,
}

impl Backend for RecordingBackend {
    async fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> AppResult<UploadReceipt> {
        Ok(UploadReceipt {
            file_id: "9b1e-report".to_string(),
            message: Some("File uploaded successfully".to_string()),
        })
    }

    async fn extract(&self, file_id: &str) -> AppResult<ExtractOutcome> {
        *self.extracted.lock().unwrap() = Some(file_id.to_string());
        Ok(ExtractOutcome {
            mcqs: None,
            message: Some("processing".to_string()),
        })
    }
}

#[tokio::test]
async fn uploaded_id_reaches_the_preview() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.pdf");
    fs::write(&path, b"%PDF-1.7\n...").unwrap();

    let config = Config::default();
    let now = Instant::now();
    let mut session = SessionStore::new();
    let mut toasts = ToastQueue::default();
    let mut upload = UploadController::new(&config);

    upload.select_paths(vec![path], &mut toasts, now);
    let file = upload.begin_submit(now).unwrap();

    let backend = RecordingBackend {
        extracted: Mutex::new(None),
    };
    let pipeline = UploadPipeline::new(backend);
    let (tx, rx) = channel::<PipelineEvent>();
    pipeline.process(&file, &tx).await;

    for event in rx.try_iter() {
        upload.on_event(event, &mut session, &mut toasts, now);
    }

    let mut preview = PreviewController::new(&config);
    assert_eq!(preview.enter(&session).as_deref(), Some("9b1e-report"));
    assert_eq!(preview.state(), &PreviewState::Loading);
    assert_eq!(preview.json_file_name(), "report_mcqs.json");
}

#[test]
fn config_file_and_env_overrides() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("mcq_client.toml");
    fs::write(
        &path,
        r#"
base_url = "http://10.0.0.5:5000/"
extract_mode = "body_param"
json_download = "remote"
"#,
    )
    .unwrap();

    let mut config = Config::from_file(&path).unwrap();
    assert_eq!(config.extract_mode, ExtractMode::BodyParam);
    assert_eq!(config.json_download, JsonDownloadMode::Remote);
    assert_eq!(config.extract_url("ignored"), "http://10.0.0.5:5000/api/extract/process");

    let errors = config.apply_env(|key| match key {
        "MCQ_EXTRACT_MODE" => Some("path_param".to_string()),
        _ => None,
    });
    assert!(errors.is_empty());
    assert_eq!(config.extract_url("a b"), "http://10.0.0.5:5000/api/extract/a%20b");
}

#[test]
fn mcq_json_round_trip_keeps_answers() {
    let mcqs = vec![
        Mcq::new(
            "Capital of France?",
            vec!["Paris".into(), "London".into(), "Rome".into(), "Berlin".into()],
            AnswerKey::Text("paris".into()),
        ),
        Mcq::new(
            "2 + 2?",
            vec!["3".into(), "5".into(), "4".into(), "22".into()],
            AnswerKey::Index(2),
        ),
    ];

    let parsed = from_json(&to_pretty_json(&mcqs).unwrap()).unwrap();

    assert_eq!(parsed, mcqs);
    assert_eq!(parsed[0].correct_index(), Some(0));
    assert_eq!(parsed[1].correct_index(), Some(2));
}

#[test]
fn validation_rules() {
    let limit = Config::default().max_file_size;
    let file = |name: &str, mime: &str, size: u64| SelectedFile {
        path: name.into(),
        name: name.to_string(),
        size,
        mime: mime.to_string(),
    };

    assert!(validate(&file("notes.PDF", "application/octet-stream", 10), limit).is_ok());
    assert!(validate(&file("exact.pdf", "application/pdf", limit), limit).is_ok());
    assert!(matches!(
        validate(&file("photo.jpg", "image/jpeg", 10), limit),
        Err(ValidationError::InvalidType { .. })
    ));
    assert!(matches!(
        validate(&file("big.pdf", "application/pdf", limit + 1), limit),
        Err(ValidationError::TooLarge { .. })
    ));
}

#[test]
fn suggestions_follow_error_text() {
    assert_eq!(suggest("Image-based PDF: no text found"), OCR_HINT);
    assert_eq!(suggest("Invalid API key provided"), API_KEY_HINT);

    let err = AppError::application("This PDF looks scanned");
    assert_eq!(err.suggestion().as_deref(), Some(OCR_HINT));
}
