//! Batch orchestration and the per-file compression pipeline.
//!
//! `video` drives the batch over all targets; `pipeline` holds the per-file
//! stage/encode/destage/relocate/verify/delete sequence and its state machine.

/// Batch orchestration over the target list
pub mod video;

/// Per-file pipeline and its state machine
pub mod pipeline;

pub use pipeline::{FileStage, TargetPaths, process_target};
pub use video::{process_videos, run_batch, run_batch_with_preflight};
