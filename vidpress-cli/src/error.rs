// ============================================================================
// vidpress-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and error reporting for the binary

// ---- Internal crate imports ----
use vidpress_core::{CoreError, CoreResult};

// ---- External crate imports ----
use owo_colors::OwoColorize;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Prints `Error: <message>` in red on stderr.
pub fn report_error(error: &CoreError) {
    eprintln!("{}", format!("Error: {error}").red());
}
