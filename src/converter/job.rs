//! Conversion job definition.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::formats::{gif_file_name, is_video_file_name};

/// A video file found in the job's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    /// Raw file name as returned by the directory listing
    file_name: OsString,
    /// Input file path
    pub input_path: PathBuf,
    /// Output file path (sibling `.gif`)
    pub output_path: PathBuf,
}

impl VideoCandidate {
    /// Build a candidate for `file_name` inside `directory`.
    pub fn new(directory: &Path, file_name: OsString) -> Self {
        let input_path = directory.join(&file_name);
        let output_path = directory.join(gif_file_name(&file_name));
        Self {
            file_name,
            input_path,
            output_path,
        }
    }

    /// Get the input file name for display.
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().to_string()
    }

    /// Get the output file name for display.
    pub fn output_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// One run over a directory of videos.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Candidates in directory-listing order
    pub candidates: Vec<VideoCandidate>,
    /// Number of successful conversions so far
    pub converted: usize,
}

impl ConversionJob {
    /// Create a job with an explicit candidate list.
    pub fn new(candidates: Vec<VideoCandidate>) -> Self {
        Self {
            candidates,
            converted: 0,
        }
    }

    /// List `directory` (non-recursively) and keep every entry with a
    /// recognized video extension, in listing order.
    pub fn scan(directory: &Path) -> io::Result<Self> {
        let mut candidates = Vec::new();

        for entry in fs::read_dir(directory)? {
            let file_name = entry?.file_name();
            if is_video_file_name(&file_name.to_string_lossy()) {
                candidates.push(VideoCandidate::new(directory, file_name));
            }
        }

        Ok(Self::new(candidates))
    }

    /// Total number of candidates.
    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Check if there is nothing to convert.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Record a successful conversion.
    pub fn mark_converted(&mut self) {
        self.converted += 1;
    }

    /// Summary line for the end of the run.
    pub fn summary(&self) -> String {
        format!(
            "Conversion process completed. Converted {} of {} videos.",
            self.converted,
            self.total()
        )
    }
}
