//! Implementation of the compression run.
//!
//! Builds the core configuration from the parsed arguments and hands the
//! batch to vidpress-core, checking for ffmpeg/ffprobe once there is work to
//! do. Prints a per-file summary at the end.

use crate::cli::Cli;
use crate::error::CliResult;

use vidpress_core::config::{CoreConfig, CoreConfigBuilder, MAX_CRF, MIN_CRF, Preset};
use vidpress_core::external::{CrateFfprobeExecutor, SidecarSpawner, check_dependencies};
use vidpress_core::{
    CompressionResult, CoreError, calculate_size_reduction, format_duration,
    format_size_decimal, run_batch_with_preflight,
};

use log::{debug, info};
use owo_colors::OwoColorize;

use std::time::Instant;

/// Translates the parsed arguments into a validated `CoreConfig`.
pub fn build_config(args: &Cli) -> CliResult<CoreConfig> {
    let crf = u8::try_from(args.crf).map_err(|_| {
        CoreError::InvalidParameter(format!(
            "crf must be between {MIN_CRF} and {MAX_CRF}, got {}",
            args.crf
        ))
    })?;
    let preset: Preset = args.preset.parse()?;

    let mut builder = CoreConfigBuilder::new()
        .crf(crf)
        .preset(preset)
        .scale(args.scale)
        .delete_original(args.delete_original);
    if let Some(source) = &args.source {
        builder = builder.source_dir(source.clone());
    }
    if let Some(destination) = &args.destination {
        builder = builder.destination_dir(destination.clone());
    }
    if let Some(process_dir) = &args.process_dir {
        builder = builder.process_dir(process_dir.clone());
    }

    builder.build()
}

/// Runs a full compression batch for `args`.
pub fn run_compress(args: &Cli) -> CliResult<()> {
    let total_start_time = Instant::now();
    let config = build_config(args)?;

    match serde_json::to_string_pretty(&config) {
        Ok(json) => debug!("Effective configuration:\n{json}"),
        Err(e) => debug!("Could not render configuration as JSON: {e}"),
    }

    let results = run_batch_with_preflight(
        &SidecarSpawner,
        &CrateFfprobeExecutor::new(),
        &config,
        check_dependencies,
    )?;

    print_summary(&results);
    info!(
        "compressed {} videos in {}",
        results.len(),
        format_duration(total_start_time.elapsed().as_secs_f64())
    );
    Ok(())
}

/// Prints one block per compressed file.
pub fn print_summary(results: &[CompressionResult]) {
    if results.is_empty() {
        return;
    }

    println!();
    println!("{}", "=".repeat(50).bright_blue());
    println!("{}", " Compression Summary ".bold());
    println!("{}", "=".repeat(50).bright_blue());
    for result in results {
        print!("{}", format_result(result));
    }
}

fn format_result(result: &CompressionResult) -> String {
    format!(
        "{}\n  {:<16}{}\n  {:<16}{}\n  {:<16}{}\n  {:<16}{}%\n  {:<16}{}\n  {:<16}{}\n",
        result.filename,
        "Encode time:",
        format_duration(result.duration.as_secs_f64()),
        "Input size:",
        format_size_decimal(result.input_size),
        "Output size:",
        format_size_decimal(result.output_size),
        "Reduced size:",
        calculate_size_reduction(result.input_size, result.output_size),
        "Output:",
        result.output_path.display(),
        "Original:",
        if result.original_deleted { "deleted" } else { "kept" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;
    use vidpress_core::FileStage;

    #[test]
    fn unknown_preset_is_invalid_parameter() {
        let cli = Cli::try_parse_from(["vidpress", "--preset", "placebo"]).unwrap();
        assert!(matches!(build_config(&cli), Err(CoreError::InvalidParameter(_))));
    }

    #[test]
    fn crf_outside_byte_range_is_invalid_parameter() {
        for crf in ["300", "-1", "256"] {
            let cli = Cli::try_parse_from(["vidpress", "--crf", crf]).unwrap();
            match build_config(&cli) {
                Err(CoreError::InvalidParameter(msg)) => assert!(msg.contains(crf), "{msg}"),
                other => panic!("crf {crf}: expected InvalidParameter, got {other:?}"),
            }
        }
    }

    #[test]
    fn summary_lists_sizes_and_reduction() {
        let result = CompressionResult {
            filename: "clip.mp4".to_string(),
            output_path: PathBuf::from("/videos/clip_compressed.mp4"),
            duration: Duration::from_secs(75),
            input_size: 50_000_000,
            output_size: 12_500_000,
            original_deleted: false,
            final_stage: FileStage::Done,
        };

        let text = format_result(&result);
        assert!(text.starts_with("clip.mp4\n"));
        assert!(text.contains("50 MB"), "{text}");
        assert!(text.contains("12 MB"), "{text}");
        assert!(text.contains("75%"), "{text}");
        assert!(text.contains("kept"), "{text}");
    }
}
