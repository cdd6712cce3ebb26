//! Video to GIF Converter Library
//!
//! Batch converts the videos of a directory into animated GIFs with FFmpeg.

pub mod app;
pub mod converter;

// Re-export commonly used types
pub use app::GifConverterApp;
pub use converter::{ConverterShell, ConverterWindow, FFmpegWrapper, WorkerEvent};
