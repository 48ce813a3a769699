//! Remediation hints derived from error text when the server sends none.

pub const OCR_HINT: &str =
    "Try using a text-based PDF or install OCR dependencies: pip install pytesseract pdf2image";
pub const CORRUPT_PDF_HINT: &str =
    "Please upload a valid PDF file. The file may be corrupted or password protected.";
pub const API_KEY_HINT: &str = "Please check the backend API key configuration (GEMINI_API_KEY).";
pub const DATABASE_HINT: &str = "Please restart the server to initialize the database.";
pub const CONNECTION_HINT: &str = "Please check your internet connection and try again.";
pub const QUOTA_HINT: &str = "The AI service is rate limited right now. Please try again later.";
pub const GENERIC_HINT: &str = "Please try again or contact support if the problem persists.";

/// Scans the lower-cased text against the keyword table, first hit wins.
pub fn suggest(error_text: &str) -> &'static str {
    let text = error_text.to_lowercase();
    let has = |needle: &str| text.contains(needle);
    let has_word = |word: &str| {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| token == word)
    };

    if has("no text found") || has("scanned") || has("image-based") || has("image based") {
        OCR_HINT
    } else if has("pdf") && (has("invalid") || has("not found") || has("corrupt")) {
        CORRUPT_PDF_HINT
    } else if has("api") && has("key") {
        API_KEY_HINT
    } else if has("database") || has_word("db") {
        DATABASE_HINT
    } else if has("connection") || has("network") || has("timed out") {
        CONNECTION_HINT
    } else if has("quota") || has("rate limit") {
        QUOTA_HINT
    } else {
        GENERIC_HINT
    }
}

/// Hint for a bare HTTP status when the body carried nothing usable.
pub fn suggest_for_status(status: u16) -> &'static str {
    match status {
        400 => "Please check your request and try again.",
        401 => "Please provide valid authentication credentials.",
        403 => "You don't have permission to access this resource.",
        404 => "The requested resource was not found. Please check the backend URL.",
        405 => "The request method is not allowed for this endpoint.",
        413 => "The file is too large. Maximum size is 10MB.",
        500 => "Server error. Please try again later or contact support.",
        502 => "Server is temporarily unavailable. Please try again later.",
        503 => "Server is under maintenance. Please try again later.",
        504 => "Server took too long to respond. Please try again.",
        _ => "An error occurred. Please try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_in_order() {
        assert_eq!(suggest("scanned PDF, no text found"), OCR_HINT);
        assert_eq!(suggest("Image-based document"), OCR_HINT);
        assert_eq!(suggest("Invalid PDF header"), CORRUPT_PDF_HINT);
        assert_eq!(suggest("PDF not found in storage"), CORRUPT_PDF_HINT);
        assert_eq!(suggest("API key not valid"), API_KEY_HINT);
        assert_eq!(suggest("Database is locked"), DATABASE_HINT);
        assert_eq!(suggest("db write failed"), DATABASE_HINT);
        assert_eq!(suggest("Connection refused"), CONNECTION_HINT);
        assert_eq!(suggest("request timed out"), CONNECTION_HINT);
        assert_eq!(suggest("Quota exceeded"), QUOTA_HINT);
        assert_eq!(suggest("hit the rate limit"), QUOTA_HINT);
        assert_eq!(suggest("something odd"), GENERIC_HINT);
    }

    #[test]
    fn db_only_matches_as_a_word() {
        assert_eq!(suggest("feedback rejected"), GENERIC_HINT);
    }

    #[test]
    fn status_table() {
        assert_eq!(
            suggest_for_status(413),
            "The file is too large. Maximum size is 10MB."
        );
        assert_eq!(suggest_for_status(418), "An error occurred. Please try again.");
    }
}
