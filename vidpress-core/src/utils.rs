//! Utility functions for formatting and file operations.
//!
//! General-purpose helpers used throughout vidpress-core: size and duration
//! formatting, ffmpeg time parsing, output naming and file moves.

use std::fs;
use std::io;
use std::path::Path;

use crate::discovery::{TARGET_EXTENSION, has_target_extension};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with decimal units (B, KB, MB, GB, TB).
///
/// The value is integer-divided by 1000 while it exceeds 10000. The unit
/// stops at TB even when the value is still above 10000.
#[must_use]
pub fn format_size_decimal(bytes: u64) -> String {
    let mut size = bytes;
    let mut unit = 0;
    while size > 10_000 && unit < SIZE_UNITS.len() - 1 {
        unit += 1;
        size /= 1000;
    }
    format!("{} {}", size, SIZE_UNITS[unit])
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parses FFmpeg time string (HH:MM:SS.MS) to seconds. Returns None if invalid.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    } else {
        None
    }
}

/// Name of the compressed output for `name`: the `.mp4` suffix (any case) is
/// replaced by `_compressed.mp4`.
#[must_use]
pub fn compressed_file_name(name: &str) -> String {
    let stem = if has_target_extension(name) {
        &name[..name.len() - TARGET_EXTENSION.len()]
    } else {
        name
    };
    format!("{stem}_compressed{TARGET_EXTENSION}")
}

/// Calculates the percentage size reduction from input to output.
/// Returns 0 if input_size is 0 to avoid division by zero.
#[must_use]
pub fn calculate_size_reduction(input_size: u64, output_size: u64) -> u64 {
    if input_size == 0 || output_size >= input_size {
        0
    } else {
        100 - ((output_size * 100) / input_size)
    }
}

/// Moves a file, falling back to copy and delete when a rename is not
/// possible (for example across filesystems).
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                rename_err
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_decimal() {
        assert_eq!(format_size_decimal(0), "0 B");
        assert_eq!(format_size_decimal(10_000), "10000 B");
        assert_eq!(format_size_decimal(10_001), "10 KB");
        // 12_345_678 -> 12345 KB -> 12 MB
        assert_eq!(format_size_decimal(12_345_678), "12 MB");
        assert_eq!(format_size_decimal(10_000_000), "10000 KB");
        assert_eq!(format_size_decimal(3_000_000_000), "3000 MB");
        assert_eq!(format_size_decimal(30_000_000_000), "30 GB");
    }

    #[test]
    fn test_format_size_decimal_caps_at_tb() {
        assert_eq!(format_size_decimal(50_000_000_000_000), "50 TB");
        assert_eq!(format_size_decimal(100_000_000_000_000_000), "100000 TB");
        assert_eq!(format_size_decimal(u64::MAX), "18446744 TB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_parse_ffmpeg_time() {
        assert_eq!(parse_ffmpeg_time("00:00:01.25"), Some(1.25));
        assert_eq!(parse_ffmpeg_time("01:30:45.75"), Some(5445.75));
        assert_eq!(parse_ffmpeg_time("00:00"), None);
        assert_eq!(parse_ffmpeg_time("aa:bb:cc"), None);
    }

    #[test]
    fn test_compressed_file_name() {
        assert_eq!(compressed_file_name("test_1.mp4"), "test_1_compressed.mp4");
        assert_eq!(compressed_file_name("Holiday.MP4"), "Holiday_compressed.mp4");
        assert_eq!(compressed_file_name("a.mp4.mp4"), "a.mp4_compressed.mp4");
    }

    #[test]
    fn test_calculate_size_reduction() {
        assert_eq!(calculate_size_reduction(100, 50), 50);
        assert_eq!(calculate_size_reduction(1000, 999), 1);
        assert_eq!(calculate_size_reduction(0, 100), 0);
        assert_eq!(calculate_size_reduction(100, 150), 0);
    }

    #[test]
    fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.mp4");
        let to = dir.path().join("b.mp4");
        fs::write(&from, b"payload").unwrap();

        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"payload");
    }
}
