// ============================================================================
// vidpress-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent API for creating a CoreConfig. Directory arguments are optional and
// resolved in `build`, which also validates the tuning parameters, so an
// invalid configuration never reaches the pipeline.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, Preset, resolve_directories, validate_crf, validate_scale};
use crate::error::CoreResult;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use vidpress_core::config::{CoreConfigBuilder, Preset};
///
/// let dir = std::env::temp_dir();
/// let config = CoreConfigBuilder::new()
///     .source_dir(dir.clone())
///     .preset(Preset::Medium)
///     .delete_original(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.destination_dir, config.source_dir);
/// assert_eq!(config.process_dir, config.source_dir);
/// assert!(config.delete_original);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    // Optional directories, defaulted during build
    source_dir: Option<PathBuf>,
    destination_dir: Option<PathBuf>,
    process_dir: Option<PathBuf>,

    // Tuning parameters with defaults
    crf: u8,
    preset: Preset,
    scale: f64,
    delete_original: bool,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new builder with the default tuning parameters.
    pub fn new() -> Self {
        Self {
            source_dir: None,
            destination_dir: None,
            process_dir: None,

            crf: super::DEFAULT_CRF,
            preset: super::DEFAULT_PRESET,
            scale: super::DEFAULT_SCALE,
            delete_original: false,
        }
    }

    /// Sets the source directory (defaults to the current directory).
    pub fn source_dir(mut self, source_dir: PathBuf) -> Self {
        self.source_dir = Some(source_dir);
        self
    }

    /// Sets the destination directory (defaults to the source directory).
    pub fn destination_dir(mut self, destination_dir: PathBuf) -> Self {
        self.destination_dir = Some(destination_dir);
        self
    }

    /// Sets the process directory (defaults to the source directory).
    pub fn process_dir(mut self, process_dir: PathBuf) -> Self {
        self.process_dir = Some(process_dir);
        self
    }

    /// Sets the CRF value; validated against 15-30 in `build`.
    pub fn crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }

    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Sets the scale factor; validated against 0.1-2.0 in `build`.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn delete_original(mut self, delete_original: bool) -> Self {
        self.delete_original = delete_original;
        self
    }

    /// Resolves the directories, validates every parameter and builds the
    /// configuration.
    ///
    /// # Errors
    ///
    /// * `CoreError::InvalidParameter` - crf or scale out of range
    /// * `CoreError::InvalidDirectory` - a directory is missing or not a directory
    pub fn build(self) -> CoreResult<CoreConfig> {
        validate_crf(self.crf)?;
        validate_scale(self.scale)?;

        let dirs = resolve_directories(self.source_dir, self.destination_dir, self.process_dir)?;

        Ok(CoreConfig {
            source_dir: dirs.source,
            destination_dir: dirs.destination,
            process_dir: dirs.process,
            crf: self.crf,
            preset: self.preset,
            scale: self.scale,
            delete_original: self.delete_original,
        })
    }
}
