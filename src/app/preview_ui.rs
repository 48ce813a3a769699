use super::{McqExtractorApp, Page};
use crate::mcq::{option_label, Mcq};
use crate::preview::{EguiClipboard, PreviewState, NO_FILE_MESSAGE};
use crate::status::Severity;
use eframe::egui::{self, RichText};
use std::time::Instant;

impl McqExtractorApp {
    pub(super) fn render_preview(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("⬅ Upload another").clicked() {
                self.navigate(Page::Upload);
            }
            if let Some(name) = self
                .state
                .preview
                .upload()
                .and_then(|u| u.file_name.clone())
            {
                ui.label(RichText::new(name).strong());
            }
        });
        ui.add_space(12.0);

        match self.state.preview.state().clone() {
            PreviewState::Idle | PreviewState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading questions...");
                });
            }
            PreviewState::MissingFile => {
                ui.colored_label(Severity::Error.color(), NO_FILE_MESSAGE);
            }
            PreviewState::Failed {
                message,
                suggestion,
            } => {
                ui.colored_label(Severity::Error.color(), format!("❌ {}", message));
                if let Some(hint) = suggestion {
                    ui.label(hint);
                }
                ui.add_space(8.0);
                if ui.button("🔄 Try again").clicked() {
                    self.load_preview();
                }
            }
            PreviewState::Loaded => {
                self.render_actions(ui);
                ui.add_space(12.0);
                for (index, mcq) in self.state.preview.mcqs().iter().enumerate() {
                    render_card(ui, index, mcq);
                    ui.add_space(8.0);
                }
                ui.add_space(8.0);
                self.render_server_files(ui);
            }
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        let count = self.state.preview.mcqs().len();
        ui.label(RichText::new(format!("{} questions extracted", count)).heading());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui.button("📋 Copy JSON").clicked() {
                let ctx = ui.ctx().clone();
                let mut clipboard = EguiClipboard::new(&ctx);
                self.state
                    .preview
                    .copy_json(&mut clipboard, &mut self.state.toasts, Instant::now());
            }

            let busy = self.state.preview.is_downloading();
            ui.add_enabled_ui(!busy, |ui| {
                if ui.button("💾 Download JSON").clicked() {
                    self.download_json();
                }
                if ui.button("📄 Download PDF").clicked() {
                    self.download_pdf();
                }
            });
            if busy {
                ui.spinner();
            }
        });
    }

    fn render_server_files(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Files on the server")
            .default_open(false)
            .show(ui, |ui| {
                if ui.small_button("⟳ Refresh").clicked() {
                    self.refresh_server_files();
                }
                match self.state.preview.server_files() {
                    None => {
                        ui.label("Not loaded yet.");
                    }
                    Some(listing) => {
                        ui.label(RichText::new(format!("JSON ({})", listing.json_files.len())).strong());
                        for name in &listing.json_files {
                            ui.label(format!("  {}", name));
                        }
                        ui.label(RichText::new(format!("PDF ({})", listing.pdf_files.len())).strong());
                        for name in &listing.pdf_files {
                            ui.label(format!("  {}", name));
                        }
                    }
                }
            });
    }
}

fn render_card(ui: &mut egui::Ui, index: usize, mcq: &Mcq) {
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(format!("Question {}", index + 1)).strong());
        ui.add_space(4.0);
        ui.label(&mcq.question);
        ui.add_space(4.0);

        for (i, option) in mcq.options.iter().enumerate() {
            let text = format!("{}. {}", option_label(i), option);
            if mcq.is_correct(i) {
                ui.colored_label(Severity::Success.color(), format!("✔ {}", text));
            } else {
                ui.label(format!("   {}", text));
            }
        }
    });
}
