//! Configuration structures and constants for the vidpress-core library.
//!
//! This module provides the batch job configuration: resolved directories and
//! the encoder tuning knobs (CRF, preset, scale) plus the delete-original flag.
//! A `CoreConfig` is built once per invocation through `CoreConfigBuilder`
//! and is immutable afterwards.

mod builder;
mod directory;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;
pub use directory::{ResolvedDirectories, resolve_directories};

// Default constants

/// Default CRF (Constant Rate Factor). Lower values produce higher quality
/// but larger files.
pub const DEFAULT_CRF: u8 = 23;

/// Smallest accepted CRF value.
pub const MIN_CRF: u8 = 15;

/// Largest accepted CRF value.
pub const MAX_CRF: u8 = 30;

/// Default encoder speed/efficiency preset.
pub const DEFAULT_PRESET: Preset = Preset::Slower;

/// Default scale factor; 1.0 leaves the resolution untouched.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Smallest accepted scale factor.
pub const MIN_SCALE: f64 = 0.1;

/// Largest accepted scale factor.
pub const MAX_SCALE: f64 = 2.0;

/// Encoder speed/efficiency preset.
///
/// Slower presets compress better at the same CRF in exchange for CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    /// All presets, fastest first.
    pub const ALL: [Preset; 7] = [
        Preset::Veryfast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::Veryslow,
    ];

    /// The name ffmpeg expects for `-preset`.
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Veryfast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::Veryslow => "veryslow",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let options: Vec<&str> = Preset::ALL.iter().map(|p| p.as_str()).collect();
                CoreError::InvalidParameter(format!(
                    "unknown preset '{}', expected one of [{}]",
                    s,
                    options.join(", ")
                ))
            })
    }
}

/// Batch job configuration.
///
/// All three directories are resolved and validated. Use
/// `CoreConfigBuilder` to construct one; it applies the directory defaults
/// and rejects out-of-range parameters.
///
/// # Examples
///
/// ```rust,no_run
/// use vidpress_core::config::{CoreConfigBuilder, Preset};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .source_dir(PathBuf::from("/videos/raw"))
///     .destination_dir(PathBuf::from("/videos/small"))
///     .crf(26)
///     .preset(Preset::Medium)
///     .scale(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(config.crf, 26);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CoreConfig {
    /// Directory scanned for `.mp4` files
    pub source_dir: PathBuf,

    /// Directory receiving the `_compressed.mp4` outputs
    pub destination_dir: PathBuf,

    /// Intermediate directory where files are staged and encoded
    pub process_dir: PathBuf,

    /// Constant rate factor passed to the encoder (15-30)
    pub crf: u8,

    /// Encoder speed/efficiency preset
    pub preset: Preset,

    /// Resize factor applied to width and height (0.1-2.0)
    pub scale: f64,

    /// Delete each original once its compressed copy is verified
    pub delete_original: bool,
}

impl CoreConfig {
    /// Validates the tuning parameters and that every directory still exists.
    pub fn validate(&self) -> CoreResult<()> {
        validate_crf(self.crf)?;
        validate_scale(self.scale)?;
        directory::ensure_directory("source", &self.source_dir)?;
        directory::ensure_directory("destination", &self.destination_dir)?;
        directory::ensure_directory("process", &self.process_dir)?;
        Ok(())
    }

    /// Whether a resize filter must be applied.
    pub fn needs_resize(&self) -> bool {
        self.scale != DEFAULT_SCALE
    }
}

pub(crate) fn validate_crf(crf: u8) -> CoreResult<()> {
    if (MIN_CRF..=MAX_CRF).contains(&crf) {
        Ok(())
    } else {
        Err(CoreError::InvalidParameter(format!(
            "crf must be between {MIN_CRF} and {MAX_CRF}, got {crf}"
        )))
    }
}

pub(crate) fn validate_scale(scale: f64) -> CoreResult<()> {
    // NaN fails the range check as well.
    if (MIN_SCALE..=MAX_SCALE).contains(&scale) {
        Ok(())
    } else {
        Err(CoreError::InvalidParameter(format!(
            "scale must be between {MIN_SCALE} and {MAX_SCALE}, got {scale}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_parses_case_insensitively() {
        assert_eq!("slower".parse::<Preset>().unwrap(), Preset::Slower);
        assert_eq!("VeryFast".parse::<Preset>().unwrap(), Preset::Veryfast);
        assert_eq!(" medium ".parse::<Preset>().unwrap(), Preset::Medium);
    }

    #[test]
    fn preset_rejects_unknown_names() {
        let err = "ultrafast".parse::<Preset>().unwrap_err();
        match err {
            CoreError::InvalidParameter(msg) => {
                assert!(msg.contains("ultrafast"));
                assert!(msg.contains("veryslow"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn preset_display_round_trips_all_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn crf_bounds_are_inclusive() {
        assert!(validate_crf(15).is_ok());
        assert!(validate_crf(30).is_ok());
        assert!(validate_crf(14).is_err());
        assert!(validate_crf(31).is_err());
    }

    #[test]
    fn scale_bounds_are_inclusive() {
        assert!(validate_scale(0.1).is_ok());
        assert!(validate_scale(2.0).is_ok());
        assert!(validate_scale(0.05).is_err());
        assert!(validate_scale(2.5).is_err());
        assert!(validate_scale(f64::NAN).is_err());
    }
}
