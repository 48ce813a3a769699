use super::{SelectedFile, PDF_MIME};
use crate::error::ValidationError;

/// Accepts a declared PDF type or a `.pdf` name.
pub fn is_pdf(file: &SelectedFile) -> bool {
    file.mime == PDF_MIME || file.name.to_lowercase().ends_with(".pdf")
}

/// Type check first, then size. No network involved.
pub fn validate(file: &SelectedFile, max_size: u64) -> Result<(), ValidationError> {
    if !is_pdf(file) {
        return Err(ValidationError::InvalidType {
            name: file.name.clone(),
            mime: file.mime.clone(),
        });
    }

    if file.size > max_size {
        return Err(ValidationError::TooLarge {
            size: file.size,
            limit: max_size,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_FILE_SIZE;
    use std::path::PathBuf;

    fn file(name: &str, mime: &str, size: u64) -> SelectedFile {
        SelectedFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            size,
            mime: mime.to_string(),
        }
    }

    #[test]
    fn rejects_non_pdf() {
        let err = validate(&file("notes.docx", "application/msword", 10), DEFAULT_MAX_FILE_SIZE)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
        assert_eq!(err.to_string(), "Invalid file type. Only PDF files are allowed.");
    }

    #[test]
    fn accepts_by_mime_or_extension() {
        assert!(validate(&file("scan", PDF_MIME, 10), DEFAULT_MAX_FILE_SIZE).is_ok());
        assert!(validate(
            &file("Chapter1.Pdf", "application/octet-stream", 10),
            DEFAULT_MAX_FILE_SIZE
        )
        .is_ok());
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate(&file("a.pdf", PDF_MIME, 10_485_760), DEFAULT_MAX_FILE_SIZE).is_ok());

        let err = validate(&file("a.pdf", PDF_MIME, 10_485_761), DEFAULT_MAX_FILE_SIZE).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge {
                size: 10_485_761,
                limit: 10_485_760
            }
        );
        assert!(err.to_string().starts_with("File too large"));
    }
}
