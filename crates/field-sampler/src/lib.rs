//! Turns a decoded velocity field into instanced draw batches.
//!
//! The work runs in two explicit stages:
//!
//! 1. [`classify`] sweeps every cell, splits cells into moving (arrow) and
//!    still (land) samples, and returns the global maximum magnitude.
//! 2. [`colorize`] takes that maximum and assigns each arrow a gradient color.
//!
//! [`build`] runs both stages and partitions the poses into batches no
//! larger than the per-draw instance cap.

pub mod batch;
pub mod config;
pub mod pose;
pub mod sampler;

pub use batch::{build, colorize, normalized_magnitude, partition, BatchSet, BatchSummary};
pub use config::{SamplerConfig, MAX_INSTANCES_PER_BATCH};
pub use pose::{look_rotation, Pose};
pub use sampler::{classify, Classified, Sample, SampleKind};
