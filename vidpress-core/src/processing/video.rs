// ============================================================================
// vidpress-core/src/processing/video.rs
// ============================================================================
//
// BATCH PROCESSING: Compress Every Target in the Source Directory
//
// This module houses the batch orchestration of the vidpress-core library.
// It runs the per-file pipeline over the target list, one file at a time,
// and stops at the first failure.
//
// WORKFLOW:
// 1. Validate the configuration; `CoreConfig` can be built without the builder
// 2. Discover target files in the source directory (run_batch only)
// 3. Log the number of targets and their names
// 4. For each target, in order:
//    a. Run the per-file pipeline (stage, encode, destage, relocate, verify)
//    b. Collect the result, or abort the batch on error

// ---- Internal crate imports ----
use crate::CompressionResult;
use crate::config::CoreConfig;
use crate::discovery::find_target_files;
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::processing::pipeline::process_target;
use crate::utils::{calculate_size_reduction, format_duration, format_size_decimal};

// ---- External crate imports ----
use log::info;

/// Compresses each file in `targets`, in order, until one fails.
///
/// The function is generic over the ffmpeg and ffprobe implementations so the
/// whole pipeline can run against test doubles.
///
/// # Arguments
///
/// * `spawner` - Implementation of FfmpegSpawner for executing ffmpeg
/// * `ffprobe_executor` - Implementation of FfprobeExecutor for reading media information
/// * `config` - The batch configuration, checked again before any file is touched
/// * `targets` - File names inside `config.source_dir`
///
/// # Returns
///
/// * `Ok(Vec<CompressionResult>)` - One result per target, in input order
/// * `Err(CoreError)` - The configuration is invalid (nothing is touched), or
///   the error of the first target that failed; later targets are never
///   started
pub fn process_videos<S, P>(
    spawner: &S,
    ffprobe_executor: &P,
    config: &CoreConfig,
    targets: &[String],
) -> CoreResult<Vec<CompressionResult>>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
{
    config.validate()?;
    let mut results = Vec::with_capacity(targets.len());

    for name in targets {
        let result = process_target(spawner, ffprobe_executor, config, name)?;
        info!(
            "{}: {} -> {} ({}% smaller) in {}",
            result.filename,
            format_size_decimal(result.input_size),
            format_size_decimal(result.output_size),
            calculate_size_reduction(result.input_size, result.output_size),
            format_duration(result.duration.as_secs_f64())
        );
        results.push(result);
    }

    Ok(results)
}

/// Discovers the targets in `config.source_dir` and compresses them.
///
/// An empty source directory is not an error; the returned list is empty.
pub fn run_batch<S, P>(
    spawner: &S,
    ffprobe_executor: &P,
    config: &CoreConfig,
) -> CoreResult<Vec<CompressionResult>>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
{
    run_batch_with_preflight(spawner, ffprobe_executor, config, || Ok(()))
}

/// Like `run_batch`, but calls `preflight` once there is at least one target
/// and before the first file is staged. An error from `preflight` aborts the
/// batch with nothing touched.
///
/// The CLI passes `external::check_dependencies` here, so a run over an empty
/// directory never needs ffmpeg installed.
pub fn run_batch_with_preflight<S, P, F>(
    spawner: &S,
    ffprobe_executor: &P,
    config: &CoreConfig,
    preflight: F,
) -> CoreResult<Vec<CompressionResult>>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    F: FnOnce() -> CoreResult<()>,
{
    config.validate()?;
    let targets = find_target_files(&config.source_dir)?;
    info!("will compress {} videos, they are {:?}", targets.len(), targets);

    if targets.is_empty() {
        return Ok(Vec::new());
    }

    preflight()?;
    process_videos(spawner, ffprobe_executor, config, &targets)
}
