//! Batching and colorization: the second sampling stage and the final output.

use rayon::prelude::*;
use seaview_common::{Color, ColorRamp, DecodedField};
use serde::Serialize;
use tracing::info;

use crate::config::SamplerConfig;
use crate::pose::Pose;
use crate::sampler::{classify, Sample};

/// Complete render input for one grid.
///
/// `arrow_colors[i]` has one entry per pose in `arrow_batches[i]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSet {
    pub arrow_batches: Vec<Vec<Pose>>,
    pub arrow_colors: Vec<Vec<Color>>,
    pub land_batches: Vec<Vec<Pose>>,
    pub max_magnitude: f32,
}

impl BatchSet {
    pub fn arrow_count(&self) -> usize {
        self.arrow_batches.iter().map(Vec::len).sum()
    }

    pub fn land_count(&self) -> usize {
        self.land_batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.arrow_batches.is_empty() && self.land_batches.is_empty()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            arrow_batches: self.arrow_batches.len(),
            land_batches: self.land_batches.len(),
            arrow_instances: self.arrow_count(),
            land_instances: self.land_count(),
            max_magnitude: self.max_magnitude,
        }
    }
}

/// Counts describing a [`BatchSet`], for logs and status output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub arrow_batches: usize,
    pub land_batches: usize,
    pub arrow_instances: usize,
    pub land_instances: usize,
    pub max_magnitude: f32,
}

/// Split `items` into contiguous batches of at most `cap` entries.
///
/// A zero cap is treated as one.
pub fn partition<T: Clone>(items: &[T], cap: usize) -> Vec<Vec<T>> {
    items.chunks(cap.max(1)).map(<[T]>::to_vec).collect()
}

/// `magnitude / max_magnitude` clamped to `[0, 1]`; zero when nothing moves.
pub fn normalized_magnitude(magnitude: f32, max_magnitude: f32) -> f32 {
    if max_magnitude > 0.0 {
        (magnitude / max_magnitude).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Color each moving sample, grouped exactly like [`partition`] groups poses.
pub fn colorize(
    moving: &[Sample],
    max_magnitude: f32,
    ramp: &dyn ColorRamp,
    cap: usize,
) -> Vec<Vec<Color>> {
    moving
        .par_chunks(cap.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|sample| ramp.color_at(normalized_magnitude(sample.magnitude, max_magnitude)))
                .collect()
        })
        .collect()
}

/// Classify, colorize and batch a decoded field.
pub fn build(field: DecodedField, config: &SamplerConfig, ramp: &dyn ColorRamp) -> BatchSet {
    let classified = classify(&field, config);
    drop(field);

    let cap = config.instance_cap;
    let arrow_colors = colorize(&classified.moving, classified.max_magnitude, ramp, cap);

    let arrow_poses: Vec<Pose> = classified
        .moving
        .iter()
        .map(|s| s.pose(config.glyph_scale))
        .collect();
    let land_poses: Vec<Pose> = classified
        .still
        .iter()
        .map(|s| s.pose(config.glyph_scale))
        .collect();

    let batches = BatchSet {
        arrow_batches: partition(&arrow_poses, cap),
        arrow_colors,
        land_batches: partition(&land_poses, cap),
        max_magnitude: classified.max_magnitude,
    };

    info!(
        arrows = batches.arrow_count(),
        land = batches.land_count(),
        arrow_batches = batches.arrow_batches.len(),
        land_batches = batches.land_batches.len(),
        max_magnitude = batches.max_magnitude,
        "Built glyph batches"
    );

    batches
}
