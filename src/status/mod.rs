mod progress;
mod toast;

pub use progress::SimulatedProgress;
pub use toast::{Toast, ToastPhase, ToastQueue, FADE_DURATION};

use crate::error::AppError;
use crate::utils::color::{self, ColorExt};
use eframe::egui::Color32;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn color(self) -> Color32 {
        Color32::hex_or_gray(match self {
            Severity::Info => color::INFO,
            Severity::Success => color::SUCCESS,
            Severity::Warning => color::WARNING,
            Severity::Error => color::ERROR,
        })
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✅",
            Severity::Warning => "⚠",
            Severity::Error => "❌",
        }
    }
}

/// Inline status line above the upload controls.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBanner {
    pub severity: Severity,
    pub title: String,
    pub subtitle: Option<String>,
    pub hide_at: Option<Instant>,
}

impl StatusBanner {
    pub fn new(severity: Severity, title: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            subtitle: None,
            hide_at: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn hide_after(mut self, now: Instant, delay: Duration) -> Self {
        self.hide_at = Some(now + delay);
        self
    }

    /// Error banner: message as title, suggestion underneath.
    pub fn from_error(err: &AppError, now: Instant, delay: Duration) -> Self {
        let banner = Self::new(Severity::Error, err.user_message()).hide_after(now, delay);
        match err.suggestion() {
            Some(hint) => banner.with_subtitle(hint),
            None => banner,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.hide_at.map_or(false, |at| now >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::suggestion::OCR_HINT;

    #[test]
    fn error_banner_carries_suggestion_and_expires() {
        let now = Instant::now();
        let err = AppError::Application {
            message: "scanned PDF, no text found".into(),
            suggestion: None,
            status: Some(500),
        };
        let banner = StatusBanner::from_error(&err, now, Duration::from_secs(8));

        assert_eq!(banner.severity, Severity::Error);
        assert_eq!(banner.title, "scanned PDF, no text found");
        assert_eq!(banner.subtitle.as_deref(), Some(OCR_HINT));
        assert!(!banner.is_expired(now + Duration::from_secs(7)));
        assert!(banner.is_expired(now + Duration::from_secs(8)));
    }

    #[test]
    fn plain_banner_never_expires() {
        let banner = StatusBanner::new(Severity::Info, "Uploading");
        assert!(!banner.is_expired(Instant::now() + Duration::from_secs(3600)));
    }
}
