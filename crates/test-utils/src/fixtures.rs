//! Common test fixtures for field pipeline tests.
//!
//! Small fields whose sampling result can be checked by hand.

use seaview_common::{DecodedField, GridShape};

/// `shape = [1, 2, 2]`, a single eastward cell at `[0][0][0]`, three still cells.
pub fn single_eastward_cell() -> DecodedField {
    DecodedField::new(
        GridShape::new(1, 2, 2),
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.0; 4],
        vec![0.0; 4],
    )
    .expect("fixture lengths match")
}

/// Every component zero everywhere.
pub fn still_field(shape: GridShape) -> DecodedField {
    let len = shape.len();
    DecodedField::new(shape, vec![0.0; len], vec![0.0; len], vec![0.0; len])
        .expect("fixture lengths match")
}

/// Uniform flow with the given velocity in every cell.
pub fn uniform_field(shape: GridShape, velocity: [f32; 3]) -> DecodedField {
    let len = shape.len();
    DecodedField::new(
        shape,
        vec![velocity[0]; len],
        vec![velocity[1]; len],
        vec![velocity[2]; len],
    )
    .expect("fixture lengths match")
}

/// Velocities whose magnitude is the flat index + 1, pointing east.
///
/// Useful for checking ordering and normalization: the last cell is the
/// fastest and every cell is moving.
pub fn ramp_field(shape: GridShape) -> DecodedField {
    let len = shape.len();
    let u = (0..len).map(|i| (i + 1) as f32).collect();
    DecodedField::new(shape, u, vec![0.0; len], vec![0.0; len]).expect("fixture lengths match")
}
