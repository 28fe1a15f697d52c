// ============================================================================
// vidpress-core/src/processing/pipeline.rs
// ============================================================================
//
// PER-FILE PIPELINE: Stage, Encode, Destage, Relocate, Verify, Delete
//
// Compresses one target file across the source, process and destination
// directories:
//
//   Pending -> Staged -> Encoded -> Relocated -> Verified -> DeletedOriginal | Done
//
// Any step may fail, which leaves the file in `Failed` and aborts the batch.
// Nothing is retried. The original is only deleted after the compressed
// output has been verified at its final location.

// ---- Internal crate imports ----
use crate::CompressionResult;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, file_op};
use crate::external::{EncodeParams, FfmpegSpawner, FfprobeExecutor, run_encode, scaled_dimensions};
use crate::utils::{compressed_file_name, move_file};

// ---- External crate imports ----
use log::{debug, error, info, warn};

// ---- Standard library imports ----
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Lifecycle of one file in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Pending,
    Staged,
    Encoded,
    Relocated,
    Verified,
    DeletedOriginal,
    Done,
    Failed,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStage::Pending => "pending",
            FileStage::Staged => "staged",
            FileStage::Encoded => "encoded",
            FileStage::Relocated => "relocated",
            FileStage::Verified => "verified",
            FileStage::DeletedOriginal => "deleted original",
            FileStage::Done => "done",
            FileStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Every path the pipeline touches for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPaths {
    /// File name of the original, e.g. `clip.mp4`
    pub name: String,
    /// File name of the output, e.g. `clip_compressed.mp4`
    pub compressed_name: String,
    /// The original in the source directory
    pub source_path: PathBuf,
    /// The staged copy in the process directory
    pub process_path: PathBuf,
    /// Where ffmpeg writes the output
    pub process_output_path: PathBuf,
    /// Final location of the output
    pub dest_output_path: PathBuf,
}

impl TargetPaths {
    pub fn new(config: &CoreConfig, name: &str) -> Self {
        let compressed_name = compressed_file_name(name);
        Self {
            name: name.to_string(),
            source_path: config.source_dir.join(name),
            process_path: config.process_dir.join(name),
            process_output_path: config.process_dir.join(&compressed_name),
            dest_output_path: config.destination_dir.join(&compressed_name),
            compressed_name,
        }
    }

    /// Whether the original has to be copied into the process directory.
    pub fn needs_staging(&self) -> bool {
        self.source_path != self.process_path
    }

    /// Whether the output has to be moved to the destination directory.
    pub fn needs_relocation(&self) -> bool {
        self.process_output_path != self.dest_output_path
    }
}

/// Compresses one target file.
///
/// # Arguments
///
/// * `spawner` - Implementation of FfmpegSpawner for executing ffmpeg
/// * `ffprobe_executor` - Implementation of FfprobeExecutor for reading media information
/// * `config` - The batch configuration
/// * `name` - File name of the target inside the source directory
///
/// # Errors
///
/// The first failing step's error is returned unchanged, after logging which
/// file and stage failed.
pub fn process_target<S, P>(
    spawner: &S,
    ffprobe_executor: &P,
    config: &CoreConfig,
    name: &str,
) -> CoreResult<CompressionResult>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
{
    info!("======== PROCESSING VIDEO: {} ========", name);
    let start_time = Instant::now();
    let mut job = FileJob::new(config, name);

    match job.run(spawner, ffprobe_executor) {
        Ok(input_size) => {
            let output_size = fs::metadata(&job.paths.dest_output_path)
                .map_err(file_op("read metadata of", &job.paths.dest_output_path))?
                .len();
            Ok(CompressionResult {
                filename: job.paths.name.clone(),
                output_path: job.paths.dest_output_path.clone(),
                duration: start_time.elapsed(),
                input_size,
                output_size,
                original_deleted: job.stage == FileStage::DeletedOriginal,
                final_stage: job.stage,
            })
        }
        Err(e) => {
            error!(
                "PROCESSING FAILED for {} (last completed stage: {}): {}",
                name, job.stage, e
            );
            job.advance(FileStage::Failed);
            Err(e)
        }
    }
}

/// State of one file moving through the pipeline.
struct FileJob<'a> {
    config: &'a CoreConfig,
    paths: TargetPaths,
    stage: FileStage,
}

impl<'a> FileJob<'a> {
    fn new(config: &'a CoreConfig, name: &str) -> Self {
        Self {
            config,
            paths: TargetPaths::new(config, name),
            stage: FileStage::Pending,
        }
    }

    fn advance(&mut self, next: FileStage) {
        debug!("{}: {} -> {}", self.paths.name, self.stage, next);
        self.stage = next;
    }

    /// Runs every step; returns the size of the original in bytes.
    fn run<S: FfmpegSpawner, P: FfprobeExecutor>(
        &mut self,
        spawner: &S,
        ffprobe_executor: &P,
    ) -> CoreResult<u64> {
        let input_size = fs::metadata(&self.paths.source_path)
            .map_err(file_op("read metadata of", &self.paths.source_path))?
            .len();
        let source_info = ffprobe_executor.media_info(&self.paths.source_path)?;
        info!("{}", source_info.summary());

        self.stage_input()?;
        if let Err(e) = self.encode(spawner, ffprobe_executor, source_info.duration_secs) {
            self.discard_staged_copy();
            return Err(e);
        }
        self.destage()?;
        self.relocate()?;
        self.verify()?;

        let output_info = ffprobe_executor.media_info(&self.paths.dest_output_path)?;
        info!("compressed: {}", output_info.summary());

        self.delete_original()?;
        Ok(input_size)
    }

    fn stage_input(&mut self) -> CoreResult<()> {
        if self.paths.needs_staging() {
            info!(
                "copying {} to {} for processing",
                self.paths.source_path.display(),
                self.paths.process_path.display()
            );
            fs::copy(&self.paths.source_path, &self.paths.process_path)
                .map_err(file_op("copy", &self.paths.source_path))?;
        }
        self.advance(FileStage::Staged);
        Ok(())
    }

    fn encode<S: FfmpegSpawner, P: FfprobeExecutor>(
        &mut self,
        spawner: &S,
        ffprobe_executor: &P,
        duration_secs: f64,
    ) -> CoreResult<()> {
        info!("compressing video ...");
        let mut params = EncodeParams::from_config(
            self.config,
            &self.paths.process_path,
            &self.paths.process_output_path,
        )
        .with_duration(duration_secs);

        if self.config.needs_resize() {
            let (width, height) = ffprobe_executor.dimensions(&self.paths.process_path)?;
            let filter = scaled_dimensions(width, height, self.config.scale);
            info!(
                "scaling {}x{} by {} to {}x{}",
                width, height, self.config.scale, filter.width, filter.height
            );
            params = params.with_scale_filter(filter);
        }

        run_encode(spawner, &params)?;
        self.advance(FileStage::Encoded);
        Ok(())
    }

    fn destage(&mut self) -> CoreResult<()> {
        if self.config.source_dir != self.config.process_dir {
            debug!("removing staged copy {}", self.paths.process_path.display());
            fs::remove_file(&self.paths.process_path)
                .map_err(file_op("remove staged copy", &self.paths.process_path))?;
        }
        Ok(())
    }

    fn relocate(&mut self) -> CoreResult<()> {
        if self.paths.needs_relocation() {
            info!(
                "moving {} to destination {}",
                self.paths.process_output_path.display(),
                self.paths.dest_output_path.display()
            );
            move_file(&self.paths.process_output_path, &self.paths.dest_output_path)
                .map_err(file_op("move", &self.paths.process_output_path))?;
        }
        self.advance(FileStage::Relocated);
        Ok(())
    }

    fn verify(&mut self) -> CoreResult<()> {
        if !self.paths.dest_output_path.is_file() {
            return Err(CoreError::CompressionVerificationFailed(
                self.paths.dest_output_path.clone(),
            ));
        }
        self.advance(FileStage::Verified);
        Ok(())
    }

    fn delete_original(&mut self) -> CoreResult<()> {
        if self.config.delete_original {
            info!("deleting original {}", self.paths.source_path.display());
            fs::remove_file(&self.paths.source_path)
                .map_err(file_op("delete original", &self.paths.source_path))?;
            self.advance(FileStage::DeletedOriginal);
        } else {
            self.advance(FileStage::Done);
        }
        Ok(())
    }

    /// Best-effort removal of the staged copy after a failed encode.
    fn discard_staged_copy(&self) {
        if self.paths.needs_staging() && self.paths.process_path.is_file() {
            if let Err(e) = fs::remove_file(&self.paths.process_path) {
                warn!(
                    "could not remove staged copy {}: {}",
                    self.paths.process_path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use std::path::Path;

    fn config(source: &str, destination: &str, process: &str) -> CoreConfig {
        CoreConfig {
            source_dir: PathBuf::from(source),
            destination_dir: PathBuf::from(destination),
            process_dir: PathBuf::from(process),
            crf: 23,
            preset: Preset::Slower,
            scale: 1.0,
            delete_original: false,
        }
    }

    #[test]
    fn paths_for_single_directory() {
        let config = config("/videos", "/videos", "/videos");
        let paths = TargetPaths::new(&config, "trip.MP4");

        assert_eq!(paths.compressed_name, "trip_compressed.mp4");
        assert_eq!(paths.source_path, Path::new("/videos/trip.MP4"));
        assert_eq!(paths.process_path, Path::new("/videos/trip.MP4"));
        assert_eq!(paths.process_output_path, Path::new("/videos/trip_compressed.mp4"));
        assert_eq!(paths.dest_output_path, Path::new("/videos/trip_compressed.mp4"));
        assert!(!paths.needs_staging());
        assert!(!paths.needs_relocation());
    }

    #[test]
    fn paths_for_separate_directories() {
        let config = config("/hdd/raw", "/hdd/small", "/ssd/work");
        let paths = TargetPaths::new(&config, "trip.mp4");

        assert_eq!(paths.process_path, Path::new("/ssd/work/trip.mp4"));
        assert_eq!(paths.process_output_path, Path::new("/ssd/work/trip_compressed.mp4"));
        assert_eq!(paths.dest_output_path, Path::new("/hdd/small/trip_compressed.mp4"));
        assert!(paths.needs_staging());
        assert!(paths.needs_relocation());
    }

    #[test]
    fn stage_names_are_readable() {
        assert_eq!(FileStage::DeletedOriginal.to_string(), "deleted original");
        assert_eq!(FileStage::Failed.to_string(), "failed");
    }
}
