// vidpress-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Only compiled for unit tests or with the "test-mocks" feature; see the
// module declaration in external/mod.rs.

use super::*;
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Bytes written to outputs created by the mock spawner.
pub const DUMMY_OUTPUT: &[u8] = b"compressed";

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern is contained in
/// one of the command arguments. Spawning with no matching expectation panics.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// Expects a call whose process exits with `exit_code`.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            // wait(2) status layout: exit code in the second byte
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    pub fn remaining_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        if expectation.result.is_ok() && expectation.create_dummy_output {
            match args.last() {
                Some(output_path) => {
                    if let Err(e) = std::fs::write(output_path, DUMMY_OUTPUT) {
                        log::error!(
                            "MockFfmpegSpawner failed to create dummy output file {}: {}",
                            output_path,
                            e
                        );
                    }
                }
                None => log::warn!(
                    "MockFfmpegSpawner couldn't find output path in args to create dummy file."
                ),
            }
        }
        expectation.result
    }
}

/// Mock implementation of FfprobeExecutor.
///
/// Answers from per-path expectations first, then from an optional default.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    results: Rc<RefCell<HashMap<PathBuf, MediaInfo>>>,
    default_result: Rc<RefCell<Option<MediaInfo>>>,
    inspected_paths: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `info` for every path without a specific expectation.
    pub fn with_default(info: MediaInfo) -> Self {
        let mock = Self::new();
        *mock.default_result.borrow_mut() = Some(info);
        mock
    }

    /// Adds the result for a specific path.
    pub fn expect_media_info(&self, input_path: &Path, info: MediaInfo) {
        self.results
            .borrow_mut()
            .insert(input_path.to_path_buf(), info);
    }

    pub fn inspected_paths(&self) -> Vec<PathBuf> {
        self.inspected_paths.borrow().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn media_info(&self, input_path: &Path) -> CoreResult<MediaInfo> {
        log::info!("MockFfprobeExecutor::media_info called for: {}", input_path.display());
        self.inspected_paths
            .borrow_mut()
            .push(input_path.to_path_buf());

        let specific = self.results.borrow().get(input_path).cloned();
        specific
            .or_else(|| self.default_result.borrow().clone())
            .ok_or_else(|| {
                CoreError::VideoInfoError(format!(
                    "MockFfprobeExecutor: No expectation set for path {}",
                    input_path.display()
                ))
            })
    }
}
