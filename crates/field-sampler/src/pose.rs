//! Glyph poses and the look-rotation used to orient arrows.

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

/// Below this squared cross-product norm a unit direction counts as parallel to up.
const PARALLEL_EPSILON: f32 = 1e-10;

/// Position, orientation and scale of one instanced glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Pose {
    pub fn new(position: Point3<f32>, rotation: UnitQuaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Unrotated pose with uniform scale.
    pub fn at(position: Point3<f32>, uniform_scale: f32) -> Self {
        Self::new(
            position,
            UnitQuaternion::identity(),
            Vector3::repeat(uniform_scale),
        )
    }

    /// Homogeneous translate * rotate * scale matrix.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let isometry = Isometry3::from_parts(Translation3::from(self.position.coords), self.rotation);
        isometry.to_homogeneous() * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Column-major matrix, ready to copy into an instance buffer.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.to_matrix().as_slice());
        out
    }

    /// Direction the glyph's forward (+Z) axis points in world space.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * Vector3::z()
    }
}

/// Rotation taking +Z onto `forward` while keeping +Y as close to up as possible.
///
/// `forward` does not need to be normalized; it is normalized in f64 so tiny
/// and huge finite vectors keep their direction. When it is parallel to the
/// up axis there is no unique roll, so the shortest-arc rotation is used.
/// A zero or non-finite `forward` gives the identity.
pub fn look_rotation(forward: &Vector3<f32>) -> UnitQuaternion<f32> {
    let wide = forward.cast::<f64>();
    let norm = wide.norm();
    if !norm.is_finite() || norm == 0.0 {
        return UnitQuaternion::identity();
    }
    let dir: Vector3<f32> = (wide / norm).cast::<f32>();
    let up = Vector3::y();

    if dir.cross(&up).norm_squared() > PARALLEL_EPSILON {
        UnitQuaternion::face_towards(&dir, &up)
    } else {
        shortest_arc_from_z(&dir)
    }
}

// rotation_between has no answer for opposite vectors; any half turn about an
// axis orthogonal to +Z works, and +Y keeps the up axis in place.
fn shortest_arc_from_z(dir: &Vector3<f32>) -> UnitQuaternion<f32> {
    UnitQuaternion::rotation_between(&Vector3::z(), dir).unwrap_or_else(|| {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI)
    })
}
