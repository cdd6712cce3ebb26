//! Converter window UI.

use std::sync::Arc;

use egui::{Color32, RichText};
use rfd::{MessageButtons, MessageDialog, MessageLevel};

use super::ffmpeg::Converter;
use super::shell::{Alert, AlertLevel, ConverterShell, RunState};

/// Video to GIF converter panel.
pub struct ConverterWindow {
    shell: ConverterShell,
}

impl ConverterWindow {
    /// Create a new converter window backed by `converter`.
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self {
            shell: ConverterShell::new(converter),
        }
    }

    /// Show the converter inside the given UI.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        // Apply worker events before drawing so the log is current
        for alert in self.shell.poll_events() {
            show_alert(&alert);
        }

        ui.vertical_centered(|ui| {
            ui.label("Select a directory containing videos to convert to GIF:");
        });
        ui.add_space(4.0);

        self.show_directory_row(ui);
        self.show_controls(ui);
        ui.separator();

        self.show_log(ui);
        ui.separator();

        let status_color = match self.shell.state() {
            RunState::Idle => Color32::GRAY,
            RunState::Ready => ui.visuals().text_color(),
            RunState::Running => Color32::LIGHT_BLUE,
        };
        ui.label(RichText::new(self.shell.status()).small().color(status_color));

        // Keep draining events while the worker runs
        if self.shell.is_running() {
            ui.ctx().request_repaint();
        }
    }

    /// Show the read-only path display.
    fn show_directory_row(&mut self, ui: &mut egui::Ui) {
        let mut path_str = self
            .shell
            .directory()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        ui.add(
            egui::TextEdit::singleline(&mut path_str)
                .hint_text("No directory selected")
                .interactive(false)
                .desired_width(f32::INFINITY),
        );
    }

    /// Show browse and start buttons.
    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_enabled_ui(self.shell.can_browse(), |ui| {
            if ui.button("📁 Browse Directory").clicked() {
                self.open_folder_dialog();
            }
        });

        ui.add_enabled_ui(self.shell.can_start(), |ui| {
            if ui.button("▶ Start Conversion").clicked() {
                if let Some(alert) = self.shell.start_conversion() {
                    show_alert(&alert);
                }
            }
        });
    }

    /// Show the scrolling conversion log.
    fn show_log(&mut self, ui: &mut egui::Ui) {
        let available_height = (ui.available_height() - 30.0).max(100.0);
        let scroll_to_bottom = self.shell.take_scroll_request();

        egui::ScrollArea::vertical()
            .max_height(available_height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let lines = self.shell.log_lines();

                if lines.is_empty() {
                    ui.label(
                        RichText::new("Conversion logs will appear here...")
                            .italics()
                            .color(Color32::GRAY),
                    );
                }

                for line in lines {
                    let text = RichText::new(line).monospace();
                    if line.starts_with("ERROR:") {
                        ui.label(text.color(Color32::RED));
                    } else {
                        ui.label(text);
                    }
                }

                if scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    }

    /// Open folder dialog to choose the source directory.
    fn open_folder_dialog(&mut self) {
        let selection = rfd::FileDialog::new()
            .set_title("Select Directory")
            .pick_folder();
        self.shell.choose_directory(selection);
    }
}

/// Present a blocking native dialog.
fn show_alert(alert: &Alert) {
    let level = match alert.level {
        AlertLevel::Info => MessageLevel::Info,
        AlertLevel::Warning => MessageLevel::Warning,
        AlertLevel::Critical => MessageLevel::Error,
    };

    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(&alert.title)
        .set_description(&alert.message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
