//! Test data generators for synthetic ocean velocity fields.
//!
//! All generators return flat `[z][y][x]` arrays (z outermost) so they can be
//! passed straight to `DecodedField::new` or packed into a wire payload.

use seaview_common::{DecodedField, GridShape};

/// Creates a component grid with predictable values.
///
/// Each cell value is `z * 10000 + y * 100 + x`, so a misindexed read is
/// obvious from the value alone.
///
/// # Example
///
/// ```
/// use seaview_common::GridShape;
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(GridShape::new(2, 3, 4));
/// assert_eq!(grid.len(), 24);
/// assert_eq!(grid[1], 1.0);      // x=1
/// assert_eq!(grid[4], 100.0);    // y=1
/// assert_eq!(grid[12], 10000.0); // z=1
/// ```
pub fn create_index_grid(shape: GridShape) -> Vec<f32> {
    let mut data = Vec::with_capacity(shape.len());
    for z in 0..shape.depth {
        for y in 0..shape.rows {
            for x in 0..shape.cols {
                data.push((z * 10000 + y * 100 + x) as f32);
            }
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(shape: GridShape, value: f32) -> Vec<f32> {
    vec![value; shape.len()]
}

/// Creates a horizontal gyre: u/v rotate around the grid center, speed grows
/// with distance from the center and decays with depth. `w` is zero.
///
/// Returns `(u, v, w)`.
pub fn create_gyre_components(shape: GridShape) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let len = shape.len();
    let mut u = Vec::with_capacity(len);
    let mut v = Vec::with_capacity(len);

    let center_x = shape.cols as f32 / 2.0;
    let center_y = shape.rows as f32 / 2.0;

    for z in 0..shape.depth {
        let depth_decay = 1.0 / (1.0 + z as f32);
        for y in 0..shape.rows {
            for x in 0..shape.cols {
                let dx = x as f32 - center_x;
                let dy = y as f32 - center_y;
                // Counter-clockwise rotation; zero exactly at the center cell.
                u.push(-dy * 0.1 * depth_decay);
                v.push(dx * 0.1 * depth_decay);
            }
        }
    }

    (u, v, vec![0.0; len])
}

/// Gyre field with a deterministic land mask: cells where the mask hash hits
/// are zeroed in all components.
pub fn create_gyre_field_with_land(shape: GridShape, seed: u32) -> DecodedField {
    let (mut u, mut v, mut w) = create_gyre_components(shape);

    for z in 0..shape.depth {
        for y in 0..shape.rows {
            for x in 0..shape.cols {
                if simple_hash(x as u32, y as u32, seed) % 5 == 0 {
                    let idx = shape.flat_index(x, y, z);
                    u[idx] = 0.0;
                    v[idx] = 0.0;
                    w[idx] = 0.0;
                }
            }
        }
    }

    DecodedField::new(shape, u, v, w).expect("generator produces matching lengths")
}

/// Gyre field without land.
pub fn create_gyre_field(shape: GridShape) -> DecodedField {
    let (u, v, w) = create_gyre_components(shape);
    DecodedField::new(shape, u, v, w).expect("generator produces matching lengths")
}

/// Encode floats as native-endian bytes, the layout of the wire buffers.
pub fn native_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
