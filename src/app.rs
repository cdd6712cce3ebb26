//! Main application state and UI

use std::sync::Arc;

use crate::converter::{ConverterWindow, FFmpegWrapper};
use eframe::egui;

/// Main application state
pub struct GifConverterApp {
    pub converter_window: ConverterWindow,
}

impl GifConverterApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Initializing Video to GIF Converter...");

        let ffmpeg = FFmpegWrapper::locate();
        Self {
            converter_window: ConverterWindow::new(Arc::new(ffmpeg)),
        }
    }
}

impl eframe::App for GifConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.converter_window.show(ui);
        });
    }
}
