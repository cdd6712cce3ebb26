//! Video to GIF Converter Module
//!
//! Converts every video in a directory to an animated GIF using FFmpeg.

mod ffmpeg;
mod formats;
mod job;
mod shell;
mod window;
mod worker;

pub use ffmpeg::{Converter, FFmpegError, FFmpegWrapper};
pub use formats::{GifSettings, VIDEO_EXTENSIONS};
pub use job::{ConversionJob, VideoCandidate};
pub use shell::{Alert, AlertLevel, ConverterShell, RunState};
pub use window::ConverterWindow;
pub use worker::{ConversionWorker, WorkerEvent, WorkerHandle};
