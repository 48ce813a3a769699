use eframe::egui::Color32;

pub const ACCENT: &str = "#4f46e5";
pub const SUCCESS: &str = "#16a34a";
pub const ERROR: &str = "#dc2626";
pub const WARNING: &str = "#d97706";
pub const INFO: &str = "#2563eb";

pub trait ColorExt {
    fn parse_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;

    /// Like [`ColorExt::parse_hex`] but falls back to gray for bad input.
    fn hex_or_gray(hex: &str) -> Self
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }

    fn hex_or_gray(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or(Color32::GRAY)
    }
}
