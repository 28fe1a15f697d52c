// ============================================================================
// vidpress-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger Backend for the `log` Facade
//
// Log records go to stdout as `YYYY-MM-DD HH:MM:SS LEVEL message`, with the
// level coloured. The level defaults to info, or debug with --verbose;
// RUST_LOG overrides both:
// - RUST_LOG=debug: Detailed debugging information
// - RUST_LOG=trace: Includes every ffmpeg progress line

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::Write;

/// Timestamp format used for every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Level used when RUST_LOG is not set.
#[must_use]
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Returns the current local time formatted with `TIMESTAMP_FORMAT`.
pub fn get_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Initializes the global logger. Calling it twice is harmless; the second
/// call is ignored.
pub fn init(verbose: bool) {
    let level = default_level(verbose);
    let env = env_logger::Env::default().default_filter_or(level.as_str());

    let result = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            let level = record.level();
            let level_str = format!("{level:<5}");
            let level_colored = match level {
                log::Level::Error => level_str.bright_red().to_string(),
                log::Level::Warn => level_str.yellow().to_string(),
                log::Level::Info => level_str.green().to_string(),
                log::Level::Debug => level_str.blue().to_string(),
                log::Level::Trace => level_str.magenta().to_string(),
            };
            writeln!(buf, "{} {} {}", get_timestamp(), level_colored, record.args())
        })
        .target(env_logger::Target::Stdout)
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialized with default level: {}", level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(default_level(false), LevelFilter::Info);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = get_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok(), "{ts}");
    }
}
