//! FFprobe integration for media analysis
//!
//! Extracts the container size, duration and the first video stream's
//! dimensions and frame rate. The values drive both the human-readable media
//! summaries printed around each compression and the resize computation.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::utils::format_size_decimal;
use ffprobe::{FfProbe, FfProbeError, ffprobe};
use std::path::Path;

/// Media information reported by ffprobe.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaInfo {
    /// Container size in bytes
    pub size_bytes: u64,
    /// Duration of the media in seconds
    pub duration_secs: f64,
    /// Width of the first video stream
    pub width: u32,
    /// Height of the first video stream
    pub height: u32,
    /// Frame rate as reported by ffprobe (e.g. "30/1")
    pub frame_rate: String,
}

impl MediaInfo {
    /// One-line summary, e.g. `SIZE: 12 MB; DURATION: 10.0; FRAME_RATE: 30/1; RESOLUTION: 1920x1080`.
    pub fn summary(&self) -> String {
        format!(
            "SIZE: {}; DURATION: {:.1}; FRAME_RATE: {}; RESOLUTION: {}x{}",
            format_size_decimal(self.size_bytes),
            self.duration_secs,
            self.frame_rate,
            self.width,
            self.height
        )
    }
}

/// Trait for reading media information files.
pub trait FfprobeExecutor {
    /// Reads the media information of `input_path`.
    fn media_info(&self, input_path: &Path) -> CoreResult<MediaInfo>;

    /// Width and height of the first video stream.
    fn dimensions(&self, input_path: &Path) -> CoreResult<(u32, u32)> {
        let info = self.media_info(input_path)?;
        Ok((info.width, info.height))
    }
}

/// `FfprobeExecutor` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn media_info(&self, input_path: &Path) -> CoreResult<MediaInfo> {
        log::debug!(
            "Running ffprobe (via crate) for media info on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => media_info_from_metadata(&metadata, input_path),
            Err(err) => {
                log::error!("ffprobe failed on {}: {:?}", input_path.display(), err);
                Err(map_ffprobe_error(err, "media info"))
            }
        }
    }
}

fn media_info_from_metadata(metadata: &FfProbe, input_path: &Path) -> CoreResult<MediaInfo> {
    let duration_secs = metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            CoreError::FfprobeParse(format!(
                "Failed to parse duration from format for {}",
                input_path.display()
            ))
        })?;

    let size_bytes = parse_container_size(&metadata.format.size).ok_or_else(|| {
        CoreError::FfprobeParse(format!(
            "Failed to parse container size for {}",
            input_path.display()
        ))
    })?;

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::VideoInfoError(format!(
                "No video stream found in {}",
                input_path.display()
            ))
        })?;

    let width = video_stream.width.ok_or_else(|| {
        CoreError::VideoInfoError(format!(
            "Video stream missing width in {}",
            input_path.display()
        ))
    })?;
    let height = video_stream.height.ok_or_else(|| {
        CoreError::VideoInfoError(format!(
            "Video stream missing height in {}",
            input_path.display()
        ))
    })?;

    if width < 0 || height < 0 {
        return Err(CoreError::VideoInfoError(format!(
            "Invalid dimensions (negative) found in {}: width={}, height={}",
            input_path.display(),
            width,
            height
        )));
    }

    Ok(MediaInfo {
        size_bytes,
        duration_secs,
        width: width as u32,
        height: height as u32,
        frame_rate: video_stream.r_frame_rate.clone(),
    })
}

/// Container size in bytes from ffprobe's decimal `format.size` string.
fn parse_container_size(size: &str) -> Option<u64> {
    size.trim().parse::<u64>().ok()
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("ffprobe {context} output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}
