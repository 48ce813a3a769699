use crate::error::AppError;
use eframe::egui;

/// Destination for "Copy JSON".
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), AppError>;
}

/// System clipboard through the egui platform output.
pub struct EguiClipboard<'a> {
    ctx: &'a egui::Context,
}

impl<'a> EguiClipboard<'a> {
    pub fn new(ctx: &'a egui::Context) -> Self {
        Self { ctx }
    }
}

impl ClipboardSink for EguiClipboard<'_> {
    fn write_text(&mut self, text: &str) -> Result<(), AppError> {
        if text.is_empty() {
            return Err(AppError::Clipboard("nothing to copy".to_string()));
        }
        self.ctx.output_mut(|o| o.copied_text = text.to_string());
        Ok(())
    }
}
