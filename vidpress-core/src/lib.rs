//! Core library for batch compression of MP4 videos using ffmpeg and ffprobe.
//!
//! This crate provides target discovery, configuration with validation, and a
//! per-file pipeline that stages each video into a process directory,
//! re-encodes it with x264, moves the result to a destination directory and
//! verifies it before optionally deleting the original.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidpress_core::{CoreConfigBuilder, CrateFfprobeExecutor, Preset, SidecarSpawner};
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new()
//!     .source_dir(PathBuf::from("/path/to/videos"))
//!     .crf(28)
//!     .preset(Preset::Fast)
//!     .scale(0.5)
//!     .build()
//!     .unwrap();
//!
//! let results = vidpress_core::run_batch(
//!     &SidecarSpawner,
//!     &CrateFfprobeExecutor::new(),
//!     &config,
//! )
//! .unwrap();
//! println!("compressed {} videos", results.len());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod processing;
pub mod progress;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, Preset, resolve_directories};
pub use discovery::{find_target_files, is_target_name};
pub use error::{CoreError, CoreResult};
pub use external::{
    CrateFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, MediaInfo, SidecarSpawner,
    check_dependencies,
};
pub use processing::{
    FileStage, process_target, process_videos, run_batch, run_batch_with_preflight,
};
pub use utils::{
    calculate_size_reduction, compressed_file_name, format_duration, format_size_decimal,
    parse_ffmpeg_time,
};

use std::path::PathBuf;
use std::time::Duration;

/// Result of compressing one file.
///
/// Returned by `process_videos` for each successfully processed video file.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// File name of the original
    pub filename: String,
    /// Final location of the compressed file
    pub output_path: PathBuf,
    /// Wall-clock time spent on this file
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
    pub original_deleted: bool,
    /// `Done` or `DeletedOriginal`
    pub final_stage: FileStage,
}
