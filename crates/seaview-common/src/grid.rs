//! Shape of a 3D velocity grid as served by the array server.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};

/// Dimensions of a `[z][y][x]` grid, stored in wire order (depth, rows, cols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of depth levels (z)
    pub depth: usize,
    /// Number of rows (y)
    pub rows: usize,
    /// Number of columns (x)
    pub cols: usize,
}

impl GridShape {
    /// Create a new grid shape.
    pub fn new(depth: usize, rows: usize, cols: usize) -> Self {
        Self { depth, rows, cols }
    }

    /// Build a shape from the integer triple carried on the wire.
    ///
    /// Anything other than exactly three non-negative dimensions is rejected.
    pub fn from_dims(dims: &[i64]) -> FieldResult<Self> {
        let [depth, rows, cols] = match dims {
            [d, r, c] => [*d, *r, *c],
            _ => {
                return Err(FieldError::shape(format!(
                    "expected 3 dimensions (z, y, x), got {}",
                    dims.len()
                )))
            }
        };

        let to_dim = |value: i64, axis: &str| -> FieldResult<usize> {
            usize::try_from(value).map_err(|_| {
                FieldError::shape(format!("dimension {} is negative: {}", axis, value))
            })
        };

        Ok(Self {
            depth: to_dim(depth, "z")?,
            rows: to_dim(rows, "y")?,
            cols: to_dim(cols, "x")?,
        })
    }

    /// Total number of cells, or `None` if the product overflows.
    pub fn checked_len(&self) -> Option<usize> {
        self.depth
            .checked_mul(self.rows)
            .and_then(|n| n.checked_mul(self.cols))
    }

    /// Total number of cells, saturating at `usize::MAX`.
    ///
    /// Shapes straight off the wire can be arbitrarily large; use
    /// [`GridShape::checked_len`] where overflow must be reported.
    pub fn len(&self) -> usize {
        self.depth
            .saturating_mul(self.rows)
            .saturating_mul(self.cols)
    }

    /// Check if the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.depth == 0 || self.rows == 0 || self.cols == 0
    }

    /// Flat row-major index of cell `[z][y][x]`.
    pub fn flat_index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.rows + y) * self.cols + x
    }

    /// Dimensions in wire order.
    pub fn as_array(&self) -> [usize; 3] {
        [self.depth, self.rows, self.cols]
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.depth, self.rows, self.cols)
    }
}
