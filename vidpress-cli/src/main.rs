// vidpress-cli/src/main.rs
//
// Entry point for the `vidpress` binary: parses arguments, sets up logging
// and runs the compression. Any error is printed in red and exits with 1.

use clap::Parser;
use vidpress_cli::error::report_error;
use vidpress_cli::{Cli, logging, run_compress};

use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run_compress(&cli) {
        log::debug!("run failed: {e:?}");
        report_error(&e);
        process::exit(1);
    }
}
