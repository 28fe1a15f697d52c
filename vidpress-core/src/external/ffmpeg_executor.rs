// ============================================================================
// vidpress-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Running an Encode as a Child Process
//
// The pipeline never talks to ffmpeg-sidecar directly. It hands a finished
// `FfmpegCommand` to an `FfmpegSpawner` and gets back an `FfmpegProcess`
// whose event stream and exit status it consumes. Tests swap in the doubles
// from `external::mocks`.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: the seam between pipeline and ffmpeg
// - SidecarSpawner / SidecarProcess: the real child process

use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Label used in process errors.
const FFMPEG_LABEL: &str = "ffmpeg";

/// A running encode.
pub trait FfmpegProcess {
    /// Feeds every event ffmpeg emits to `handler` until the stream ends or
    /// the handler returns an error.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Blocks until ffmpeg exits.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Starts encodes.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// An ffmpeg child started through ffmpeg-sidecar.
pub struct SidecarProcess {
    child: FfmpegChild,
}

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let mut events = self.child.iter().map_err(event_stream_error)?;
        events.try_for_each(handler)
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.child
            .wait()
            .map_err(|e| command_wait_error(FFMPEG_LABEL, e))
    }
}

/// `FfmpegSpawner` that starts the real ffmpeg binary.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        log::debug!("Spawning {cmd:?}");
        let child = cmd
            .spawn()
            .map_err(|e| command_start_error(FFMPEG_LABEL, e))?;
        Ok(SidecarProcess { child })
    }
}

/// The child's output pipes could not be attached. The process has not
/// reported an exit status at this point, so none is invented.
fn event_stream_error(err: impl fmt::Display) -> CoreError {
    log::error!("Failed to read ffmpeg events: {err}");
    CoreError::Io(io::Error::other(format!(
        "could not read {FFMPEG_LABEL} event stream: {err}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_stream_failure_does_not_claim_an_exit_status() {
        let err = event_stream_error("stderr already taken");
        assert!(matches!(err, CoreError::Io(_)));

        let msg = err.to_string();
        assert!(msg.contains("could not read ffmpeg event stream"), "{msg}");
        assert!(msg.contains("stderr already taken"), "{msg}");
        assert!(!msg.contains("exit status"), "{msg}");
    }
}
