//! GIF output settings and recognized input formats.

use std::ffi::OsStr;
use std::path::Path;

/// Recognized video file extensions (matched case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "flv", "wmv"];

/// Extension given to every converted file.
pub const OUTPUT_EXTENSION: &str = "gif";

/// Encoding parameters handed to FFmpeg's filter graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifSettings {
    /// Output frame sampling rate
    pub fps: u32,
    /// Output width in pixels; height follows the aspect ratio
    pub width: u32,
    /// Name of the swscale resampling algorithm
    pub scaler: &'static str,
}

impl Default for GifSettings {
    fn default() -> Self {
        Self {
            fps: 10,
            width: 320,
            scaler: "lanczos",
        }
    }
}

impl GifSettings {
    /// Returns the `-vf` filter chain, e.g. `fps=10,scale=320:-1:flags=lanczos`.
    pub fn filter_chain(&self) -> String {
        format!(
            "fps={},scale={}:-1:flags={}",
            self.fps, self.width, self.scaler
        )
    }
}

/// Check if a file name ends with one of the recognized video extensions.
pub fn is_video_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Output file name for a video: same base name, `.gif` extension.
pub fn gif_file_name(name: &OsStr) -> std::ffi::OsString {
    Path::new(name)
        .with_extension(OUTPUT_EXTENSION)
        .into_os_string()
}
