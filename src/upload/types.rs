use super::PDF_MIME;
use crate::error::{AppError, AppResult};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const OCTET_STREAM: &str = "application/octet-stream";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// The file picked or dropped by the user. Content is read at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mime = sniff_mime(path, &name).to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            mime,
        })
    }
}

/// Declared type from the extension, falling back to the `%PDF-` header.
fn sniff_mime(path: &Path, name: &str) -> &'static str {
    if name.to_lowercase().ends_with(".pdf") {
        return PDF_MIME;
    }

    let mut header = [0u8; 5];
    let matches_magic = File::open(path)
        .and_then(|mut f| f.read_exact(&mut header))
        .map(|_| header == PDF_MAGIC)
        .unwrap_or(false);

    if matches_magic {
        PDF_MIME
    } else {
        OCTET_STREAM
    }
}

/// Result of a finished upload + extract sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub file_id: String,
    pub file_name: String,
    pub mcq_count: Option<usize>,
    /// Server note for the extract step, shown when no count came back.
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum PipelineEvent {
    Uploading { file_name: String },
    Extracting {
        file_id: String,
        upload_message: Option<String>,
    },
    Completed(PipelineOutcome),
    Failed(AppError),
}
