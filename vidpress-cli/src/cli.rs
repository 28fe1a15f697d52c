// vidpress-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;
use vidpress_core::config::{DEFAULT_CRF, DEFAULT_PRESET, DEFAULT_SCALE};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "vidpress",
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vidpress: batch MP4 compression tool",
    long_about = "Re-encodes every .mp4 file in a directory with x264 using ffmpeg, \
                  writing NAME_compressed.mp4 next to it or into a destination directory."
)]
pub struct Cli {
    /// Directory containing the .mp4 files to compress (defaults to the current directory)
    #[arg(short = 'f', long = "source", value_name = "SOURCE_DIR")]
    pub source: Option<PathBuf>,

    /// Directory for the compressed files (defaults to SOURCE_DIR)
    #[arg(short = 't', long = "destination", value_name = "DEST_DIR")]
    pub destination: Option<PathBuf>,

    /// Scratch directory where files are encoded, e.g. on a fast disk (defaults to SOURCE_DIR)
    #[arg(short = 'p', long = "process-dir", value_name = "PROCESS_DIR")]
    pub process_dir: Option<PathBuf>,

    /// Delete each original once its compressed file is verified
    #[arg(short = 'd', long = "delete-original", default_value_t = false)]
    pub delete_original: bool,

    /// x264 constant rate factor (15-30, lower is better quality)
    #[arg(
        long,
        value_name = "CRF",
        default_value_t = i64::from(DEFAULT_CRF),
        allow_negative_numbers = true
    )]
    pub crf: i64,

    /// x264 preset: veryfast, faster, fast, medium, slow, slower, veryslow
    #[arg(long, value_name = "PRESET", default_value_t = DEFAULT_PRESET.to_string())]
    pub preset: String,

    /// Resize factor applied to width and height (0.1-2.0)
    #[arg(
        long,
        value_name = "FACTOR",
        default_value_t = DEFAULT_SCALE,
        allow_negative_numbers = true
    )]
    pub scale: f64,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["vidpress"]).unwrap();
        assert!(cli.source.is_none());
        assert!(cli.destination.is_none());
        assert!(cli.process_dir.is_none());
        assert!(!cli.delete_original);
        assert_eq!(cli.crf, 23);
        assert_eq!(cli.preset, "slower");
        assert_eq!(cli.scale, 1.0);
        assert!(!cli.verbose);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from([
            "vidpress", "-f", "/in", "-t", "/out", "-p", "/tmp/work", "-d", "-v",
        ])
        .unwrap();
        assert_eq!(cli.source, Some(PathBuf::from("/in")));
        assert_eq!(cli.destination, Some(PathBuf::from("/out")));
        assert_eq!(cli.process_dir, Some(PathBuf::from("/tmp/work")));
        assert!(cli.delete_original);
        assert!(cli.verbose);
    }

    #[test]
    fn long_flags() {
        let cli = Cli::try_parse_from([
            "vidpress",
            "--source",
            "/in",
            "--crf",
            "28",
            "--preset",
            "fast",
            "--scale",
            "0.5",
        ])
        .unwrap();
        assert_eq!(cli.crf, 28);
        assert_eq!(cli.preset, "fast");
        assert_eq!(cli.scale, 0.5);
    }

    #[test]
    fn out_of_range_numbers_reach_validation() {
        let cli = Cli::try_parse_from(["vidpress", "--crf", "-1", "--scale", "-0.5"]).unwrap();
        assert_eq!(cli.crf, -1);
        assert_eq!(cli.scale, -0.5);

        let cli = Cli::try_parse_from(["vidpress", "--crf", "300"]).unwrap();
        assert_eq!(cli.crf, 300);
    }

    #[test]
    fn rejects_non_numeric_crf() {
        assert!(Cli::try_parse_from(["vidpress", "--crf", "high"]).is_err());
    }
}
