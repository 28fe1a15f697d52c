// vidpress-cli/src/lib.rs
//
// Library portion of the vidpress CLI application.
// Contains the argument definition, logging setup and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::compress::run_compress;
