//! FFmpeg wrapper for video to GIF conversion.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use thiserror::Error;

use super::formats::GifSettings;

/// Errors that can occur during FFmpeg operations.
#[derive(Error, Debug)]
pub enum FFmpegError {
    #[error("FFmpeg binary not found")]
    NotFound,
    #[error("FFmpeg is not usable: {0}")]
    Unavailable(String),
    #[error("Failed to spawn FFmpeg process: {0}")]
    SpawnFailed(io::Error),
    #[error("{0}")]
    ConversionFailed(String),
}

impl FFmpegError {
    /// Whether this error means the converter itself is missing, as opposed
    /// to a single file failing.
    pub fn is_missing_tool(&self) -> bool {
        matches!(self, FFmpegError::NotFound | FFmpegError::Unavailable(_))
    }

    /// Text shown to the user for a per-file failure.
    pub fn diagnostic(&self) -> String {
        match self {
            FFmpegError::ConversionFailed(stderr) => stderr.clone(),
            other => other.to_string(),
        }
    }
}

impl From<io::Error> for FFmpegError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            FFmpegError::NotFound
        } else {
            FFmpegError::SpawnFailed(err)
        }
    }
}

/// Something that can turn one video into one GIF.
///
/// Implemented by [`FFmpegWrapper`]; the worker only depends on this trait.
pub trait Converter: Send + Sync {
    /// Lightweight probe that the converter can be invoked at all.
    fn check_available(&self) -> Result<(), FFmpegError>;

    /// Convert `input` into `output`, overwriting `output` if it exists.
    fn convert(&self, input: &Path, output: &Path) -> Result<(), FFmpegError>;
}

/// FFmpeg wrapper for spawning FFmpeg processes.
#[derive(Debug, Clone)]
pub struct FFmpegWrapper {
    /// Path (or bare name) of the FFmpeg binary
    ffmpeg_path: PathBuf,
    /// Filter settings for every conversion
    settings: GifSettings,
}

impl FFmpegWrapper {
    /// Create a wrapper around a specific binary.
    pub fn new(ffmpeg_path: impl Into<PathBuf>, settings: GifSettings) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            settings,
        }
    }

    /// Resolve FFmpeg from the system PATH.
    ///
    /// Falls back to the bare program name so that a missing binary is
    /// reported by the availability check rather than here.
    pub fn locate() -> Self {
        let ffmpeg_path = match which::which("ffmpeg") {
            Ok(path) => {
                log::info!("Using FFmpeg at {}", path.display());
                path
            }
            Err(e) => {
                log::warn!("FFmpeg not found in PATH: {}", e);
                PathBuf::from("ffmpeg")
            }
        };
        Self::new(ffmpeg_path, GifSettings::default())
    }

    /// Arguments for converting `input` into the GIF at `output`.
    pub fn conversion_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-vf".into(),
            self.settings.filter_chain().into(),
            "-y".into(), // Overwrite output
            output.as_os_str().to_owned(),
        ]
    }

    /// Run FFmpeg to completion, capturing stdout and stderr.
    fn run(&self, args: &[OsString]) -> Result<Output, FFmpegError> {
        log::debug!("Running {} {:?}", self.ffmpeg_path.display(), args);

        let output = Command::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(output)
    }
}

impl Converter for FFmpegWrapper {
    fn check_available(&self) -> Result<(), FFmpegError> {
        let output = self.run(&["-version".into()])?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FFmpegError::Unavailable(format!(
                "`{} -version` exited with {}",
                self.ffmpeg_path.display(),
                output.status
            )))
        }
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<(), FFmpegError> {
        let result = self.run(&self.conversion_args(input, output))?;

        if result.status.success() {
            Ok(())
        } else {
            Err(FFmpegError::ConversionFailed(
                String::from_utf8_lossy(&result.stderr).to_string(),
            ))
        }
    }
}
