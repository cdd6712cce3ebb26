//! Background worker that converts a directory of videos.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use super::ffmpeg::Converter;
use super::job::ConversionJob;

const FFMPEG_NOT_INSTALLED: &str = "FFmpeg is not installed or not in your system's PATH.\n\
                                    Please install FFmpeg to use this converter.";
const FFMPEG_DISAPPEARED: &str =
    "FFmpeg command not found. Please ensure FFmpeg is installed and in your PATH.";
const NO_VIDEOS_FOUND: &str = "No video files found in the selected directory.";

/// Events from the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Informational log line
    Progress(String),
    /// The run went through every candidate
    Finished(String),
    /// Something failed; see [`ConversionWorker::run`] for which errors end the run
    Error(String),
}

impl WorkerEvent {
    /// The human-readable text carried by the event.
    pub fn message(&self) -> &str {
        match self {
            WorkerEvent::Progress(msg) | WorkerEvent::Finished(msg) | WorkerEvent::Error(msg) => {
                msg
            }
        }
    }
}

/// Converts every video in one directory, reporting through [`WorkerEvent`]s.
pub struct ConversionWorker {
    directory: PathBuf,
    converter: Arc<dyn Converter>,
}

impl ConversionWorker {
    pub fn new(directory: PathBuf, converter: Arc<dyn Converter>) -> Self {
        Self {
            directory,
            converter,
        }
    }

    /// Start the run on its own thread.
    pub fn spawn(self) -> WorkerHandle {
        let (event_tx, event_rx) = unbounded::<WorkerEvent>();

        let thread = thread::spawn(move || {
            self.run(&event_tx);
        });

        WorkerHandle {
            event_rx,
            thread: Some(thread),
            finished: false,
        }
    }

    /// Run the whole job on the current thread.
    ///
    /// Never fails: every problem is reported as an event. A missing converter
    /// (at preflight or mid-run) or an unreadable directory ends the run with an
    /// [`WorkerEvent::Error`]. A single file failing emits an error event too,
    /// but the run carries on and still ends with [`WorkerEvent::Finished`].
    pub fn run(&self, events: &Sender<WorkerEvent>) {
        let emit = |event: WorkerEvent| {
            // The shell may already be gone; nothing left to report to.
            let _ = events.send(event);
        };

        log::info!("Starting GIF conversion in {}", self.directory.display());

        if let Err(e) = self.converter.check_available() {
            log::error!("FFmpeg availability check failed: {}", e);
            emit(WorkerEvent::Error(FFMPEG_NOT_INSTALLED.to_string()));
            return;
        }

        let mut job = match ConversionJob::scan(&self.directory) {
            Ok(job) => job,
            Err(e) => {
                log::error!("Failed to list {}: {}", self.directory.display(), e);
                emit(WorkerEvent::Error(format!(
                    "Failed to read directory '{}': {}",
                    self.directory.display(),
                    e
                )));
                return;
            }
        };

        if job.is_empty() {
            emit(WorkerEvent::Progress(NO_VIDEOS_FOUND.to_string()));
            emit(WorkerEvent::Finished(job.summary()));
            return;
        }

        let total = job.total();
        emit(WorkerEvent::Progress(format!(
            "Found {} video(s). Starting conversion...",
            total
        )));

        for index in 0..total {
            let candidate = &job.candidates[index];
            let name = candidate.display_name();

            log::info!("Converting {} ({}/{})", candidate.input_path.display(), index + 1, total);
            emit(WorkerEvent::Progress(format!(
                "Converting '{}' ({}/{})...",
                name,
                index + 1,
                total
            )));

            match self
                .converter
                .convert(&candidate.input_path, &candidate.output_path)
            {
                Ok(()) => {
                    let message = format!(
                        "Successfully converted '{}' to '{}'.",
                        name,
                        candidate.output_name()
                    );
                    job.mark_converted();
                    emit(WorkerEvent::Progress(message));
                }
                Err(e) if e.is_missing_tool() => {
                    log::error!("FFmpeg disappeared while converting {}: {}", name, e);
                    emit(WorkerEvent::Error(FFMPEG_DISAPPEARED.to_string()));
                    return;
                }
                Err(e) => {
                    let diagnostic = e.diagnostic();
                    log::warn!("Failed to convert {}: {}", name, diagnostic);
                    emit(WorkerEvent::Progress(format!(
                        "Error converting '{}': {}",
                        name, diagnostic
                    )));
                    emit(WorkerEvent::Error(format!(
                        "Failed to convert '{}'. Error: {}",
                        name, diagnostic
                    )));
                }
            }
        }

        log::info!("Converted {} of {} videos", job.converted, total);
        emit(WorkerEvent::Finished(job.summary()));
    }
}

/// Shell-side handle on a running worker.
pub struct WorkerHandle {
    event_rx: Receiver<WorkerEvent>,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

impl WorkerHandle {
    /// Drain pending events without blocking, in emission order.
    ///
    /// Once the worker thread has exited and every event has been drained,
    /// [`Self::is_finished`] turns true.
    pub fn poll_events(&mut self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => {
                    // The sender is dropped before the thread exits, so one
                    // more pass observes the disconnect.
                    if self.thread.as_ref().is_some_and(|t| t.is_finished()) {
                        continue;
                    }
                    break;
                }
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    if let Some(handle) = self.thread.take() {
                        if handle.join().is_err() {
                            log::error!("Conversion worker panicked");
                        }
                    }
                    break;
                }
            }
        }
        events
    }

    /// Whether the worker has exited and its channel is drained.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
