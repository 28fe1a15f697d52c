//! Command implementations for the CLI.

/// Compresses every target in the source directory and prints a summary.
pub mod compress;
