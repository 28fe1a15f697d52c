//! File discovery module for finding videos to compress.
//!
//! Only the top level of the source directory is scanned. A file is a target
//! when its name ends in `.mp4` (case-insensitive) and does not already
//! contain `compressed`, so outputs of earlier runs are never reprocessed.

use crate::error::CoreResult;

use std::path::Path;

/// Marker that identifies files produced by a previous run.
pub const COMPRESSED_MARKER: &str = "compressed";

/// Extension of the files vidpress compresses.
pub const TARGET_EXTENSION: &str = ".mp4";

/// Returns true when `name` should be compressed.
#[must_use]
pub fn is_target_name(name: &str) -> bool {
    has_target_extension(name) && !name.contains(COMPRESSED_MARKER)
}

pub(crate) fn has_target_extension(name: &str) -> bool {
    let ext_len = TARGET_EXTENSION.len();
    name.len() >= ext_len
        && name.is_char_boundary(name.len() - ext_len)
        && name[name.len() - ext_len..].eq_ignore_ascii_case(TARGET_EXTENSION)
}

/// Finds the file names eligible for compression in `source_dir`.
///
/// The result is sorted by name so runs are reproducible. Directories and
/// names that are not valid UTF-8 are skipped. An empty list is not an error.
///
/// # Examples
///
/// ```rust,no_run
/// use vidpress_core::find_target_files;
/// use std::path::Path;
///
/// let targets = find_target_files(Path::new("/videos")).unwrap();
/// println!("will compress {} videos, they are {:?}", targets.len(), targets);
/// ```
pub fn find_target_files(source_dir: &Path) -> CoreResult<Vec<String>> {
    let read_dir = std::fs::read_dir(source_dir)?;
    let mut targets: Vec<String> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.path().is_file() {
                return None;
            }

            entry
                .file_name()
                .to_str()
                .filter(|name| is_target_name(name))
                .map(str::to_string)
        })
        .collect();

    targets.sort();
    log::debug!(
        "Found {} target(s) in {}",
        targets.len(),
        source_dir.display()
    );
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_mp4_case_insensitively() {
        assert!(is_target_name("clip.mp4"));
        assert!(is_target_name("clip.MP4"));
        assert!(is_target_name("clip.Mp4"));
    }

    #[test]
    fn rejects_other_extensions_and_compressed_names() {
        assert!(!is_target_name("clip.mkv"));
        assert!(!is_target_name("clip.mp4.txt"));
        assert!(!is_target_name("mp4"));
        assert!(!is_target_name(""));
        assert!(!is_target_name("clip_compressed.mp4"));
        assert!(!is_target_name("compressed_holiday.MP4"));
    }

    #[test]
    fn handles_multibyte_names() {
        assert!(is_target_name("vidéo.mp4"));
        assert!(!is_target_name("日本"));
    }
}
