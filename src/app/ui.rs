use super::{BackendStatus, McqExtractorApp, Page};
use crate::status::{Severity, StatusBanner};
use crate::utils::color::{self, ColorExt};
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;
use std::time::Instant;
use tracing::warn;

impl McqExtractorApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_footer(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.state.page {
                Page::Upload => self.render_upload(ui),
                Page::Preview => self.render_preview(ui),
            });
        });

        self.render_toasts(ctx);
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("MCQ Extractor AI");
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                if ui.small_button("⟳").on_hover_text("Check backend").clicked() {
                    self.check_health();
                }
                let (text, tint) = match &self.state.backend {
                    BackendStatus::Unknown => ("Backend: unknown".to_string(), Severity::Info),
                    BackendStatus::Checking => ("Backend: checking...".to_string(), Severity::Info),
                    BackendStatus::Online(label) => (format!("● {}", label), Severity::Success),
                    BackendStatus::Offline(_) => ("● Backend offline".to_string(), Severity::Error),
                };
                let label = ui.colored_label(tint.color(), text);
                if let BackendStatus::Offline(reason) = &self.state.backend {
                    label.on_hover_text(reason);
                }
            });
        });
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.heading("Extract questions from a PDF");
            ui.add_space(5.0);
            ui.label(
                RichText::new("Upload a document and let the AI pull out its multiple-choice questions")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });

        ui.add_space(20.0);
        self.render_drop_zone(ui);
        ui.add_space(12.0);

        if let Some(file) = self.state.upload.selected().cloned() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label("📄");
                    ui.label(RichText::new(&file.name).strong());
                    ui.label(
                        RichText::new(format_size(file.size))
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        ui.add_enabled_ui(!self.state.upload.is_busy(), |ui| {
                            if ui.button("✖ Remove").clicked() {
                                self.state.upload.clear();
                            }
                        });
                    });
                });
            });
            ui.add_space(12.0);
        }

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.state.upload.can_submit(), |ui| {
                let button = egui::Button::new("🚀 Extract MCQs").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.start_upload();
                }
            });
        });

        if let Some(value) = self.state.upload.progress().value() {
            ui.add_space(16.0);
            let bar = egui::ProgressBar::new(value / 100.0)
                .show_percentage()
                .animate(value < 100.0)
                .fill(Color32::hex_or_gray(color::ACCENT));
            ui.add(bar);
        }

        if let Some(banner) = self.state.upload.banner() {
            ui.add_space(12.0);
            render_banner(ui, banner);
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke_color = if hovering {
            Color32::hex_or_gray(color::ACCENT)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(if hovering { 2.0 } else { 1.0 }, stroke_color))
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📥").size(32.0));
                    ui.label(if hovering {
                        "Release to select the file"
                    } else {
                        "Drag & drop a PDF here"
                    });
                    ui.add_space(6.0);
                    ui.add_enabled_ui(!self.state.upload.is_busy(), |ui| {
                        if ui.button("📁 Browse...").clicked() {
                            if let Some(path) = FileDialog::new().add_filter("PDF", &["pdf"]).pick_file() {
                                self.state
                                    .upload
                                    .select_paths(vec![path], &mut self.state.toasts, Instant::now());
                            }
                        }
                    });
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!(
                            "PDF only, up to {}",
                            format_size(self.api.config().max_file_size)
                        ))
                        .small()
                        .color(ui.visuals().text_color().gamma_multiply(0.6)),
                    );
                });
            });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.state.toasts.is_empty() {
            return;
        }
        let now = Instant::now();

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 48.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in self.state.toasts.iter() {
                    let alpha = toast.opacity(now);
                    let tint = toast.severity.color().gamma_multiply(alpha);
                    let text = ui.visuals().text_color().gamma_multiply(alpha);

                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, tint))
                        .show(ui, |ui| {
                            ui.set_max_width(300.0);
                            ui.horizontal(|ui| {
                                ui.colored_label(tint, toast.severity.icon());
                                ui.label(RichText::new(&toast.title).strong().color(text));
                            });
                            if let Some(subtitle) = &toast.subtitle {
                                ui.label(RichText::new(subtitle).small().color(text));
                            }
                        });
                    ui.add_space(6.0);
                }
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        let config = self.api.config();
        ui.horizontal(|ui| {
            ui.label("Backend");
            if ui
                .add(
                    egui::Label::new(
                        RichText::new(&config.base_url).color(Color32::hex_or_gray(color::ACCENT)),
                    )
                    .sense(egui::Sense::click()),
                )
                .clicked()
            {
                if let Err(e) = open::that(config.health_url()) {
                    warn!("Could not open browser: {}", e);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                if ui.button("📂 Downloads").clicked() {
                    if let Err(e) = open::that(&config.download_dir) {
                        warn!("Could not open {}: {}", config.download_dir.display(), e);
                    }
                }
            });
        });
    }
}

fn render_banner(ui: &mut egui::Ui, banner: &StatusBanner) {
    let tint = banner.severity.color();
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, tint))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.colored_label(tint, banner.severity.icon());
                ui.label(RichText::new(&banner.title).strong());
            });
            if let Some(subtitle) = &banner.subtitle {
                ui.label(
                    RichText::new(subtitle).color(ui.visuals().text_color().gamma_multiply(0.8)),
                );
            }
        });
}
