//! Decoded velocity field handed from the payload codec to the sampler.

use crate::error::{FieldError, FieldResult};
use crate::grid::GridShape;

/// Three flat velocity components over a `[z][y][x]` grid.
///
/// Construction validates that every component holds exactly
/// `shape.len()` values, so indexing never has to re-check lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    shape: GridShape,
    u: Vec<f32>,
    v: Vec<f32>,
    w: Vec<f32>,
}

impl DecodedField {
    pub fn new(shape: GridShape, u: Vec<f32>, v: Vec<f32>, w: Vec<f32>) -> FieldResult<Self> {
        let expected = shape
            .checked_len()
            .ok_or_else(|| FieldError::shape(format!("shape {} overflows", shape)))?;

        for (name, values) in [("u", &u), ("v", &v), ("w", &w)] {
            if values.len() != expected {
                return Err(FieldError::shape(format!(
                    "component {} has {} values, shape {} requires {}",
                    name,
                    values.len(),
                    shape,
                    expected
                )));
            }
        }

        Ok(Self { shape, u, v, w })
    }

    /// A field with no cells.
    pub fn empty() -> Self {
        Self {
            shape: GridShape::new(0, 0, 0),
            u: Vec::new(),
            v: Vec::new(),
            w: Vec::new(),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn u(&self) -> &[f32] {
        &self.u
    }

    pub fn v(&self) -> &[f32] {
        &self.v
    }

    pub fn w(&self) -> &[f32] {
        &self.w
    }

    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Velocity `(u, v, w)` at cell `[z][y][x]`, or `None` outside the grid.
    pub fn velocity_at(&self, x: usize, y: usize, z: usize) -> Option<[f32; 3]> {
        if x >= self.shape.cols || y >= self.shape.rows || z >= self.shape.depth {
            return None;
        }
        let idx = self.shape.flat_index(x, y, z);
        Some([self.u[idx], self.v[idx], self.w[idx]])
    }
}
