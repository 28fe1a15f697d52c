//! FFmpeg command building and execution for compression
//!
//! Builds the x264 re-encode command (CRF, preset, optional resize filter),
//! runs it through an `FfmpegSpawner`, and turns a non-zero exit into
//! `CoreError::EncodingFailed`.

use crate::config::{CoreConfig, Preset};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::progress::FfmpegProgressHandler;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::paths::ffmpeg_path;
use log::{debug, info};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Video codec used for every output.
pub const VIDEO_CODEC: &str = "libx264";

/// Log verbosity passed to ffmpeg. Warnings and errors keep their level
/// prefix so they can be told apart; `-stats` still reports progress.
pub const FFMPEG_LOG_LEVEL: &str = "level+warning";

/// Target dimensions for the resize filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleFilter {
    pub width: u32,
    pub height: u32,
}

impl ScaleFilter {
    /// The `-vf` argument, e.g. `scale=960:540`.
    pub fn to_filter_arg(self) -> String {
        format!("scale={}:{}", self.width, self.height)
    }
}

/// Computes scaled dimensions: each side is multiplied by `scale`, truncated,
/// and bumped by one when odd (yuv420 chroma subsampling needs even sizes).
#[must_use]
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> ScaleFilter {
    let even = |side: u32| {
        let scaled = (f64::from(side) * scale) as u32;
        if scaled % 2 != 0 { scaled + 1 } else { scaled }
    };
    ScaleFilter {
        width: even(width),
        height: even(height),
    }
}

/// Parameters required for running one compression.
#[derive(Debug, Clone)]
pub struct EncodeParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub crf: u8,
    pub preset: Preset,
    pub log_level: &'static str,
    pub scale_filter: Option<ScaleFilter>,
    /// Input duration in seconds, used for progress display only.
    pub duration: Option<f64>,
}

impl EncodeParams {
    /// Parameters for compressing `input_path` into `output_path` with the
    /// batch settings. No resize filter is set; see `with_scale_filter`.
    pub fn from_config(config: &CoreConfig, input_path: &Path, output_path: &Path) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            crf: config.crf,
            preset: config.preset,
            log_level: FFMPEG_LOG_LEVEL,
            scale_filter: None,
            duration: None,
        }
    }

    pub fn with_scale_filter(mut self, filter: ScaleFilter) -> Self {
        self.scale_filter = Some(filter);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Builds the ffmpeg command for `params`. The output path is always the
/// last argument.
///
/// The command is assembled from a bare `Command` so `-loglevel` appears
/// once; `FfmpegCommand::new` would add its own `level+info`.
#[must_use]
pub fn build_encode_command(params: &EncodeParams) -> FfmpegCommand {
    let mut inner = Command::new(ffmpeg_path());
    inner.stdin(Stdio::piped());
    inner.stdout(Stdio::piped());
    inner.stderr(Stdio::piped());

    let mut cmd = FfmpegCommand::from(inner);
    cmd.create_no_window();
    cmd.hide_banner();
    cmd.overwrite();
    cmd.input(params.input_path.to_string_lossy().as_ref());
    cmd.args(["-c:v", VIDEO_CODEC]);
    cmd.arg("-crf").arg(params.crf.to_string());
    cmd.args(["-preset", params.preset.as_str()]);
    if let Some(filter) = params.scale_filter {
        cmd.arg("-vf").arg(filter.to_filter_arg());
    }
    cmd.args(["-loglevel", params.log_level]);
    cmd.arg("-stats");
    cmd.output(params.output_path.to_string_lossy().as_ref());
    cmd
}

/// Runs one compression and waits for ffmpeg to exit.
///
/// # Errors
///
/// * `CoreError::EncodingFailed` - ffmpeg could not be started, its events
///   could not be read, or it exited unsuccessfully
pub fn run_encode<S: FfmpegSpawner>(spawner: &S, params: &EncodeParams) -> CoreResult<()> {
    let file = params
        .input_path
        .file_name()
        .map_or_else(|| params.input_path.to_string_lossy(), |name| name.to_string_lossy())
        .into_owned();

    debug!("Encode parameters: {params:?}");
    let cmd = build_encode_command(params);
    debug!("FFmpeg command: {cmd:?}");

    let encoding_failed = |message: String| CoreError::EncodingFailed {
        file: file.clone(),
        message,
    };

    let mut process = spawner
        .spawn(cmd)
        .map_err(|e| encoding_failed(e.to_string()))?;

    let mut handler = FfmpegProgressHandler::new(params.duration);
    let events = process.handle_events(|event| handler.handle_event(event));
    handler.finish();
    events.map_err(|e| encoding_failed(e.to_string()))?;

    let status = process.wait().map_err(|e| encoding_failed(e.to_string()))?;
    if status.success() {
        info!("Encode finished successfully for {file}");
        Ok(())
    } else {
        Err(encoding_failed(format!(
            "ffmpeg exited with status {:?}: {}",
            status.code(),
            handler.stderr_buffer().trim()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &FfmpegCommand) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    fn params(scale_filter: Option<ScaleFilter>) -> EncodeParams {
        EncodeParams {
            input_path: PathBuf::from("/proc/clip.mp4"),
            output_path: PathBuf::from("/proc/clip_compressed.mp4"),
            crf: 23,
            preset: Preset::Slower,
            log_level: FFMPEG_LOG_LEVEL,
            scale_filter,
            duration: None,
        }
    }

    #[test]
    fn scaled_dimensions_halves_even_sizes() {
        assert_eq!(
            scaled_dimensions(1920, 1080, 0.5),
            ScaleFilter { width: 960, height: 540 }
        );
    }

    #[test]
    fn scaled_dimensions_bumps_odd_results() {
        // 1280 * 0.3 = 384, 720 * 0.3 = 216 (floating point gives 215.99..)
        let filter = scaled_dimensions(1280, 720, 0.3);
        assert_eq!(filter.width % 2, 0);
        assert_eq!(filter.height % 2, 0);

        assert_eq!(
            scaled_dimensions(642, 362, 0.5),
            ScaleFilter { width: 322, height: 182 }
        );
        assert_eq!(
            scaled_dimensions(101, 99, 1.5),
            ScaleFilter { width: 152, height: 148 }
        );
    }

    #[test]
    fn command_carries_quality_and_preset() {
        let args = args_of(&build_encode_command(&params(None)));

        assert_eq!(value_after(&args, "-crf"), Some("23"));
        assert_eq!(value_after(&args, "-preset"), Some("slower"));
        assert_eq!(value_after(&args, "-c:v"), Some(VIDEO_CODEC));
        assert_eq!(value_after(&args, "-i"), Some("/proc/clip.mp4"));
        assert_eq!(value_after(&args, "-loglevel"), Some(FFMPEG_LOG_LEVEL));
        assert!(args.iter().any(|a| a == "-stats"));
        assert!(!args.iter().any(|a| a == "-vf"));
        assert_eq!(args.last().map(String::as_str), Some("/proc/clip_compressed.mp4"));
    }

    #[test]
    fn command_sets_log_level_once() {
        let args = args_of(&build_encode_command(&params(None)));
        let levels: Vec<&String> = args.iter().filter(|a| *a == "-loglevel").collect();
        assert_eq!(levels.len(), 1, "args: {args:?}");
        assert_eq!(value_after(&args, "-loglevel"), Some(FFMPEG_LOG_LEVEL));
    }

    #[test]
    fn command_adds_scale_filter_when_requested() {
        let filter = ScaleFilter { width: 640, height: 360 };
        let args = args_of(&build_encode_command(&params(Some(filter))));
        assert_eq!(value_after(&args, "-vf"), Some("scale=640:360"));
    }
}
