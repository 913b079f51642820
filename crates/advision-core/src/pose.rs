//! Rigid poses and anchor placement in front of a camera.

use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Column-major 4×4 layout: `columns[3]` holds the translation.
pub type PoseColumns = [[f32; 4]; 4];

/// Homogeneous 4×4 transform (rotation + translation) in world space.
///
/// Serialized as four columns, matching the layout tracking runtimes hand
/// out. The matrix is not checked for orthonormality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoseColumns", into = "PoseColumns")]
pub struct Pose {
    pub matrix: Matrix4<f32>,
}

impl Pose {
    pub fn new(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    /// Pure translation.
    pub fn from_translation(t: Vector3<f32>) -> Self {
        Self::new(Matrix4::new_translation(&t))
    }

    pub fn from_columns(columns: PoseColumns) -> Self {
        let mut m = Matrix4::zeros();
        for (c, col) in columns.iter().enumerate() {
            for (r, v) in col.iter().enumerate() {
                m[(r, c)] = *v;
            }
        }
        Self::new(m)
    }

    pub fn to_columns(&self) -> PoseColumns {
        let mut out = [[0.0; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, v) in col.iter_mut().enumerate() {
                *v = self.matrix[(r, c)];
            }
        }
        out
    }

    pub fn translation(&self) -> Vector3<f32> {
        Vector3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    /// `self * other`: `other` expressed in this pose's frame.
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose::new(self.matrix * other.matrix)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<PoseColumns> for Pose {
    fn from(columns: PoseColumns) -> Self {
        Self::from_columns(columns)
    }
}

impl From<Pose> for PoseColumns {
    fn from(pose: Pose) -> Self {
        pose.to_columns()
    }
}

/// Placement for a new anchor `distance` meters in front of the camera.
///
/// Forward is -Z in camera space, so the local offset is `(0, 0, -distance)`
/// and the result is `camera_pose * offset`. The sign of `distance` is not
/// checked.
pub fn place_anchor(distance: f32, camera_pose: &Pose) -> Pose {
    let offset = Pose::from_translation(Vector3::new(0.0, 0.0, -distance));
    let placed = camera_pose.compose(&offset);
    log::trace!(
        "anchor at {:.3} m -> world translation {:?}",
        distance,
        placed.translation()
    );
    placed
}

/// Pose of a plane lying on a detected image anchor.
///
/// Planes are modelled in their local XY plane; a -90° turn about X lays
/// them onto the anchor's XZ plane, facing up along the anchor's +Y.
pub fn overlay_pose(anchor: &Pose) -> Pose {
    let lay_flat = Rotation3::from_axis_angle(&Vector3::x_axis(), -std::f32::consts::FRAC_PI_2);
    anchor.compose(&Pose::new(lay_flat.to_homogeneous()))
}
