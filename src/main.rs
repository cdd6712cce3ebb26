//! Video to GIF Converter
//!
//! Main entry point for the application.

use gif_converter::GifConverterApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting Video to GIF Converter v{}", env!("CARGO_PKG_VERSION"));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Video to GIF Converter"),
        ..Default::default()
    };

    eframe::run_native(
        "Video to GIF Converter",
        native_options,
        Box::new(|cc| Box::new(GifConverterApp::new(cc))),
    )
}
