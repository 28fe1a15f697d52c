// ============================================================================
// vidpress-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates interactions with the external command-line tools
// vidpress depends on. Traits abstract process spawning and media inspection so the
// pipeline can run against test doubles.
//
// KEY COMPONENTS:
// - Traits for external tool interactions (FfmpegSpawner, FfprobeExecutor)
// - Concrete implementations using ffmpeg-sidecar and ffprobe crates
// - Dependency checking
// - Mock implementations for tests

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains ffmpeg argument building logic and encode execution
pub mod ffmpeg;

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Test doubles for the ffmpeg/ffprobe traits
#[cfg(all(unix, any(test, feature = "test-mocks")))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{EncodeParams, ScaleFilter, run_encode, scaled_dimensions};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor, MediaInfo};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a required external command is available and executable.
///
/// The command is run with `-version`; only a failure to start it counts.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - the command is not on the PATH
/// * `CoreError::CommandStart` - the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Checks for both ffmpeg and ffprobe.
pub fn check_dependencies() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_is_reported_by_name() {
        let err = check_dependency("vidpress-surely-not-installed-42").unwrap_err();
        match err {
            CoreError::DependencyNotFound(name) => {
                assert_eq!(name, "vidpress-surely-not-installed-42")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
