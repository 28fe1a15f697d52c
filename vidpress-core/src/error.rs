// ============================================================================
// vidpress-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the vidpress Core Library
//
// Every fallible operation in the core returns `CoreResult<T>`. Any error
// aborts the whole batch; there is no per-file isolation and no retry.
//
// KEY COMPONENTS:
// - CoreError: the error enum shared by the core and the CLI
// - CoreResult: result alias
// - command_*_error: constructors for external process failures

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the vidpress core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A resolved directory does not exist or is not a directory.
    #[error("Invalid {role} directory: {}", path.display())]
    InvalidDirectory { role: &'static str, path: PathBuf },

    /// A tuning parameter is out of its allowed range or set.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The external encoder failed for a file.
    #[error("Encoding failed for {file}: {message}")]
    EncodingFailed { file: String, message: String },

    /// The compressed output is missing after relocation.
    #[error("Compression verification failed: no output file at {}", .0.display())]
    CompressionVerificationFailed(PathBuf),

    /// A filesystem step of the pipeline failed.
    #[error("Failed to {action} {}: {source}", path.display())]
    FileOperation {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{0}' failed with status {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Required external dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("Video information error: {0}")]
    VideoInfoError(String),
}

/// Result type used throughout vidpress.
pub type CoreResult<T> = Result<T, CoreError>;

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

/// Builds a `FileOperation` error mapper for use with `map_err`.
pub(crate) fn file_op(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> CoreError {
    let path = path.into();
    move |source| CoreError::FileOperation { action, path, source }
}
