//! Converter state shared by the window: selected directory, log, status line
//! and the single active run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ffmpeg::Converter;
use super::worker::{ConversionWorker, WorkerEvent, WorkerHandle};

const STATUS_READY: &str = "Ready.";
const STATUS_SELECTED: &str = "Directory selected. Click 'Start Conversion'.";
const STATUS_RUNNING: &str = "Conversion in progress...";
const STATUS_COMPLETE: &str = "Conversion complete.";
const STATUS_FAILED: &str = "Conversion failed.";
const WORKER_STOPPED: &str = "The conversion stopped unexpectedly.";

/// Where the shell is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No directory chosen
    Idle,
    /// Directory chosen, nothing running
    Ready,
    /// A worker is active
    Running,
}

/// Severity of a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

/// A blocking dialog the window should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(level: AlertLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Owns the selected directory, the visible log and at most one running worker.
pub struct ConverterShell {
    converter: Arc<dyn Converter>,
    directory: Option<PathBuf>,
    log: Vec<String>,
    status: String,
    worker: Option<WorkerHandle>,
    /// Whether the active run has reported a finished or error event
    terminal_seen: bool,
    scroll_to_bottom: bool,
}

impl ConverterShell {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self {
            converter,
            directory: None,
            log: Vec::new(),
            status: STATUS_READY.to_string(),
            worker: None,
            terminal_seen: false,
            scroll_to_bottom: false,
        }
    }

    pub fn state(&self) -> RunState {
        if self.worker.is_some() {
            RunState::Running
        } else if self.directory.is_some() {
            RunState::Ready
        } else {
            RunState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// The browse control is usable whenever no run is active.
    pub fn can_browse(&self) -> bool {
        !self.is_running()
    }

    /// The start control is usable iff a directory is stored and nothing runs.
    pub fn can_start(&self) -> bool {
        self.directory.is_some() && !self.is_running()
    }

    /// Returns true once after new log lines arrived, so the view can scroll.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    /// Apply the outcome of the directory picker; `None` means it was cancelled.
    pub fn choose_directory(&mut self, selection: Option<PathBuf>) {
        if self.is_running() {
            log::warn!("Ignoring directory selection while a conversion is running");
            return;
        }

        match selection {
            Some(path) => {
                log::info!("Directory selected: {}", path.display());
                self.log.clear();
                self.append(format!("Directory selected: {}", path.display()));
                self.directory = Some(path);
                self.status = STATUS_SELECTED.to_string();
            }
            None => {
                self.directory = None;
                self.append("No directory selected.".to_string());
                self.status = STATUS_READY.to_string();
            }
        }
    }

    /// Start a worker for the stored directory.
    ///
    /// Returns a warning alert if no directory is stored. Does nothing while a
    /// run is already active.
    pub fn start_conversion(&mut self) -> Option<Alert> {
        if self.is_running() {
            return None;
        }

        let Some(directory) = self.directory.clone() else {
            return Some(Alert::new(
                AlertLevel::Warning,
                "No Directory",
                "Please select a directory first.",
            ));
        };

        self.log.clear();
        self.append("Starting video conversion process...".to_string());
        self.status = STATUS_RUNNING.to_string();
        self.terminal_seen = false;

        let worker = ConversionWorker::new(directory, Arc::clone(&self.converter));
        self.worker = Some(worker.spawn());
        None
    }

    /// Drain worker events and apply them in order.
    ///
    /// Returns the dialogs to present, in order. When the worker has exited the
    /// run is released and the controls become usable again.
    pub fn poll_events(&mut self) -> Vec<Alert> {
        let Some(worker) = self.worker.as_mut() else {
            return Vec::new();
        };

        let events = worker.poll_events();
        let finished = worker.is_finished();

        let mut alerts: Vec<Alert> = events
            .into_iter()
            .filter_map(|event| self.apply_event(event))
            .collect();

        if finished {
            log::info!("Conversion worker exited");
            self.worker = None;

            // A worker that dies without a terminal event must not leave the
            // status stuck on "in progress".
            if !self.terminal_seen {
                log::error!("Conversion worker exited without reporting a result");
                alerts.extend(self.apply_event(WorkerEvent::Error(WORKER_STOPPED.to_string())));
            }
        }

        alerts
    }

    /// Reflect a single worker event in the log and status line.
    pub fn apply_event(&mut self, event: WorkerEvent) -> Option<Alert> {
        log::debug!("Worker event: {}", event.message());

        match event {
            WorkerEvent::Progress(message) => {
                self.append(message);
                None
            }
            WorkerEvent::Finished(message) => {
                self.terminal_seen = true;
                self.append(message.clone());
                self.status = STATUS_COMPLETE.to_string();
                Some(Alert::new(AlertLevel::Info, "Conversion Complete", message))
            }
            WorkerEvent::Error(message) => {
                self.terminal_seen = true;
                self.append(format!("ERROR: {}", message));
                self.status = STATUS_FAILED.to_string();
                Some(Alert::new(AlertLevel::Critical, "Conversion Error", message))
            }
        }
    }

    fn append(&mut self, line: String) {
        self.log.push(line);
        self.scroll_to_bottom = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::worker::tests::FakeConverter;
    use std::fs;
    use std::thread;
    use std::time::{Duration, Instant};

    fn shell_with(converter: FakeConverter) -> ConverterShell {
        ConverterShell::new(Arc::new(converter))
    }

    /// Poll until the run ends, collecting every alert.
    fn wait_for_run(shell: &mut ConverterShell) -> Vec<Alert> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut alerts = Vec::new();
        while shell.is_running() {
            assert!(Instant::now() < deadline, "conversion did not finish");
            alerts.extend(shell.poll_events());
            thread::sleep(Duration::from_millis(5));
        }
        alerts
    }

    #[test]
    fn test_initial_state() {
        let shell = shell_with(FakeConverter::default());
        assert_eq!(shell.state(), RunState::Idle);
        assert!(!shell.can_start());
        assert!(shell.can_browse());
        assert_eq!(shell.status(), "Ready.");
    }

    #[test]
    fn test_choose_and_cancel_directory() {
        let mut shell = shell_with(FakeConverter::default());

        shell.choose_directory(Some(PathBuf::from("/videos")));
        assert_eq!(shell.state(), RunState::Ready);
        assert!(shell.can_start());
        assert_eq!(shell.log_lines(), ["Directory selected: /videos"]);
        assert_eq!(shell.status(), STATUS_SELECTED);

        shell.choose_directory(None);
        assert_eq!(shell.state(), RunState::Idle);
        assert!(!shell.can_start());
        assert_eq!(shell.directory(), None);
        assert_eq!(
            shell.log_lines(),
            ["Directory selected: /videos", "No directory selected."]
        );
        assert_eq!(shell.status(), "Ready.");
    }

    #[test]
    fn test_start_without_directory_warns() {
        let mut shell = shell_with(FakeConverter::default());

        let alert = shell.start_conversion().unwrap();
        assert_eq!(alert.level, AlertLevel::Warning);
        assert!(!shell.is_running());
    }

    #[test]
    fn test_successful_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clip.MP4"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let mut shell = shell_with(FakeConverter::default());
        shell.choose_directory(Some(dir.path().to_path_buf()));

        assert_eq!(shell.start_conversion(), None);
        assert_eq!(shell.state(), RunState::Running);
        assert!(!shell.can_start());
        assert!(!shell.can_browse());
        assert_eq!(shell.status(), "Conversion in progress...");

        let alerts = wait_for_run(&mut shell);

        let summary = "Conversion process completed. Converted 1 of 1 videos.";
        assert_eq!(
            alerts,
            vec![Alert::new(AlertLevel::Info, "Conversion Complete", summary)]
        );
        assert_eq!(shell.log_lines().first().unwrap(), "Starting video conversion process...");
        assert_eq!(shell.log_lines().last().unwrap(), summary);
        assert_eq!(shell.status(), "Conversion complete.");
        assert_eq!(shell.state(), RunState::Ready);
        assert!(shell.can_start());
        assert!(shell.can_browse());
        assert!(shell.take_scroll_request());
        assert!(!shell.take_scroll_request());
    }

    #[test]
    fn test_missing_converter_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), b"").unwrap();

        let mut shell = shell_with(FakeConverter {
            unavailable: true,
            ..Default::default()
        });
        shell.choose_directory(Some(dir.path().to_path_buf()));
        shell.start_conversion();

        let alerts = wait_for_run(&mut shell);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert!(shell.log_lines().last().unwrap().starts_with("ERROR: FFmpeg is not installed"));
        assert_eq!(shell.status(), "Conversion failed.");
        assert!(shell.can_start());
    }

    #[test]
    fn test_per_file_error_keeps_run_active_until_finished() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.mp4"), b"").unwrap();
        fs::write(dir.path().join("good.mp4"), b"").unwrap();

        let mut shell = shell_with(FakeConverter {
            failing: vec!["bad.mp4"],
            ..Default::default()
        });
        shell.choose_directory(Some(dir.path().to_path_buf()));
        shell.start_conversion();

        let alerts = wait_for_run(&mut shell);

        let levels: Vec<AlertLevel> = alerts.iter().map(|a| a.level).collect();
        assert_eq!(levels, vec![AlertLevel::Critical, AlertLevel::Info]);
        assert!(shell
            .log_lines()
            .contains(&"ERROR: Failed to convert 'bad.mp4'. Error: Invalid data found".to_string()));
        assert_eq!(
            alerts[1].message,
            "Conversion process completed. Converted 1 of 2 videos."
        );
        assert_eq!(shell.status(), "Conversion complete.");
    }

    #[test]
    fn test_error_event_while_running_does_not_release_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(FakeConverter::default());
        shell.choose_directory(Some(dir.path().to_path_buf()));
        shell.start_conversion();

        let alert = shell.apply_event(WorkerEvent::Error("boom".to_string()));

        assert_eq!(alert.unwrap().level, AlertLevel::Critical);
        assert!(shell.is_running());
        assert!(!shell.can_start());

        wait_for_run(&mut shell);
        assert!(shell.can_start());
    }

    /// Converter whose conversions crash the worker thread.
    struct CrashingConverter;

    impl Converter for CrashingConverter {
        fn check_available(&self) -> Result<(), crate::converter::FFmpegError> {
            Ok(())
        }

        fn convert(
            &self,
            _input: &Path,
            _output: &Path,
        ) -> Result<(), crate::converter::FFmpegError> {
            panic!("converter crashed");
        }
    }

    #[test]
    fn test_worker_crash_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), b"").unwrap();

        let mut shell = ConverterShell::new(Arc::new(CrashingConverter));
        shell.choose_directory(Some(dir.path().to_path_buf()));
        shell.start_conversion();

        let alerts = wait_for_run(&mut shell);

        assert_eq!(
            alerts.last(),
            Some(&Alert::new(AlertLevel::Critical, "Conversion Error", WORKER_STOPPED))
        );
        assert_eq!(shell.status(), "Conversion failed.");
        assert!(shell.can_start());
    }

    #[test]
    fn test_directory_cannot_change_while_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(FakeConverter::default());
        shell.choose_directory(Some(dir.path().to_path_buf()));
        shell.start_conversion();

        shell.choose_directory(None);
        assert_eq!(shell.directory(), Some(dir.path()));

        wait_for_run(&mut shell);
    }
}
