//! Cell classification: the first of the two sampling stages.

use nalgebra::{Point3, Vector3};
use seaview_common::DecodedField;
use tracing::debug;

use crate::config::SamplerConfig;
use crate::pose::{look_rotation, Pose};

/// Whether a cell carries flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Non-zero velocity, drawn as an arrow
    Moving,
    /// Zero velocity (land or slack water), drawn as a land block
    Still,
}

/// One grid cell mapped to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Grid index `[x, y, z]`
    pub cell: [usize; 3],
    pub position: Point3<f32>,
    /// Raw `(u, v, w)` as read from the field
    pub velocity: Vector3<f32>,
    pub magnitude: f32,
    pub kind: SampleKind,
}

impl Sample {
    /// Velocity in world axes: `u` east along +X, `w` vertical along +Y,
    /// `v` north along +Z.
    pub fn world_direction(&self) -> Vector3<f32> {
        Vector3::new(self.velocity.x, self.velocity.z, self.velocity.y)
    }

    /// Pose for the glyph; arrows face along the flow, land is unrotated.
    pub fn pose(&self, glyph_scale: f32) -> Pose {
        match self.kind {
            SampleKind::Moving => Pose::new(
                self.position,
                look_rotation(&self.world_direction()),
                Vector3::repeat(glyph_scale),
            ),
            SampleKind::Still => Pose::at(self.position, glyph_scale),
        }
    }
}

/// Output of the classification stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classified {
    pub moving: Vec<Sample>,
    pub still: Vec<Sample>,
    /// Largest moving magnitude; zero when nothing moves.
    pub max_magnitude: f32,
}

impl Classified {
    pub fn len(&self) -> usize {
        self.moving.len() + self.still.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moving.is_empty() && self.still.is_empty()
    }
}

/// World position of cell `(x, y, z)`. Depth maps to the vertical axis.
pub fn world_position(x: usize, y: usize, z: usize, spacing: f32) -> Point3<f32> {
    Point3::new(
        x as f32 * spacing,
        z as f32 * spacing,
        y as f32 * spacing,
    )
}

/// Euclidean norm without the f32 overflow of squaring large components.
fn speed(velocity: &Vector3<f32>) -> f32 {
    velocity.cast::<f64>().norm() as f32
}

/// Sweep every cell (x outermost, z innermost) and split moving from still.
///
/// A cell is moving only when its magnitude is finite and strictly positive,
/// so NaN and infinite velocities fall through to still. The magnitude is
/// computed in f64 so large finite components do not overflow.
pub fn classify(field: &DecodedField, config: &SamplerConfig) -> Classified {
    let shape = field.shape();
    let mut classified = Classified::default();

    if shape.is_empty() {
        return classified;
    }

    let (u, v, w) = (field.u(), field.v(), field.w());

    for x in 0..shape.cols {
        for y in 0..shape.rows {
            for z in 0..shape.depth {
                let idx = shape.flat_index(x, y, z);
                let velocity = Vector3::new(u[idx], v[idx], w[idx]);
                let magnitude = speed(&velocity);

                let kind = if magnitude.is_finite() && magnitude > 0.0 {
                    classified.max_magnitude = classified.max_magnitude.max(magnitude);
                    SampleKind::Moving
                } else {
                    SampleKind::Still
                };

                let sample = Sample {
                    cell: [x, y, z],
                    position: world_position(x, y, z, config.spacing),
                    velocity,
                    magnitude,
                    kind,
                };

                match kind {
                    SampleKind::Moving => classified.moving.push(sample),
                    SampleKind::Still => classified.still.push(sample),
                }
            }
        }
    }

    debug!(
        moving = classified.moving.len(),
        still = classified.still.len(),
        max_magnitude = classified.max_magnitude,
        "Classified field cells"
    );

    classified
}
