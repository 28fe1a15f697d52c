// ============================================================================
// vidpress-core/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: FFmpeg Event Handling During an Encode
//
// Consumes the event stream of a running ffmpeg process. Progress events move
// an indicatif progress bar sized to the input duration (hidden automatically
// when stderr is not a terminal), log lines are forwarded to the `log` facade,
// and warning/error output is buffered so a failed encode can report it.

use crate::error::CoreResult;
use crate::utils::{format_duration, parse_ffmpeg_time};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use indicatif::{ProgressBar, ProgressStyle};

/// Handler for ffmpeg events emitted while one file is being compressed.
pub struct FfmpegProgressHandler {
    duration: Option<f64>,
    progress_bar: ProgressBar,
    max_position: u64,
    stderr_buffer: String,
}

impl FfmpegProgressHandler {
    /// Creates a handler; `duration` (seconds) sizes the progress bar.
    #[must_use]
    pub fn new(duration: Option<f64>) -> Self {
        let duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        let progress_bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("  Compressing: {percent:>3}% [{bar:30}] ({elapsed}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.");
        progress_bar.set_style(style);

        Self {
            duration,
            progress_bar,
            max_position: 0,
            stderr_buffer: String::new(),
        }
    }

    /// Handles one ffmpeg event.
    pub fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(level, &message),
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
        Ok(())
    }

    /// Warning and error output collected so far.
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    /// Removes the progress bar from the terminal.
    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        let percent = self
            .duration
            .map_or(0.0, |d| (current_secs / d * 100.0).clamp(0.0, 100.0));

        // ffmpeg occasionally reports time going backwards
        let position = percent as u64;
        if position >= self.max_position {
            self.max_position = position;
            self.progress_bar.set_position(position);
        }
        self.progress_bar.set_message(format!(
            "{} / {} @ {:.2}x",
            format_duration(current_secs),
            format_duration(self.duration.unwrap_or(0.0)),
            progress.speed
        ));
        log::trace!("ffmpeg progress: frame={} time={}", progress.frame, progress.time);
    }

    fn handle_log(&mut self, level: FfmpegLogLevel, message: &str) {
        match level {
            FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => {
                log::error!(target: "ffmpeg_log", "{message}");
                self.push_stderr(message);
            }
            FfmpegLogLevel::Warning => {
                log::warn!(target: "ffmpeg_log", "{message}");
                self.push_stderr(message);
            }
            FfmpegLogLevel::Info => log::debug!(target: "ffmpeg_log", "{message}"),
            _ => log::trace!(target: "ffmpeg_log", "{message}"),
        }
    }

    fn handle_error(&mut self, error: &str) {
        log::error!("ffmpeg stderr error: {error}");
        self.push_stderr(error);
    }

    fn push_stderr(&mut self, line: &str) {
        self.stderr_buffer.push_str(line);
        self.stderr_buffer.push('\n');
    }
}
