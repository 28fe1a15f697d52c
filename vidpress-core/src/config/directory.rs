//! Directory resolution
//!
//! Turns the optional source/destination/process arguments into three
//! validated, canonical directories. Unset destination and process
//! directories fall back to the source, and an unset source falls back to
//! the current working directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// The three directories a batch works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDirectories {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub process: PathBuf,
}

/// Resolves and validates the batch directories.
///
/// Each directory is canonicalized so that later path comparisons see the
/// real location rather than its spelling.
///
/// # Errors
///
/// * `CoreError::InvalidDirectory` - a path does not exist or is not a directory
/// * `CoreError::Io` - the current working directory cannot be read
pub fn resolve_directories(
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
    process: Option<PathBuf>,
) -> CoreResult<ResolvedDirectories> {
    let source = match source {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let source = canonical_directory("source", &source)?;

    let destination = match destination {
        Some(dir) => canonical_directory("destination", &dir)?,
        None => source.clone(),
    };
    let process = match process {
        Some(dir) => canonical_directory("process", &dir)?,
        None => source.clone(),
    };

    log::debug!(
        "Resolved directories: source={}, destination={}, process={}",
        source.display(),
        destination.display(),
        process.display()
    );

    Ok(ResolvedDirectories {
        source,
        destination,
        process,
    })
}

pub(crate) fn ensure_directory(role: &'static str, path: &Path) -> CoreResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CoreError::InvalidDirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}

fn canonical_directory(role: &'static str, path: &Path) -> CoreResult<PathBuf> {
    ensure_directory(role, path)?;
    path.canonicalize().map_err(|_| CoreError::InvalidDirectory {
        role,
        path: path.to_path_buf(),
    })
}
