//! Far-plane frustum corners used to rebuild per-pixel view rays
//!
//! Corners are camera-space directions at unit distance along the forward
//! axis, which points down -Z (right-handed, Y-up). Evaluators index them
//! with the corner tag carried by each full-screen quad vertex, so the
//! order below is part of the wire contract.

use glam::{Mat4, Vec3};

/// Index of each corner in [`FrustumCorners::corners`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    pub const fn index(self) -> u32 {
        self as u32
    }
}

/// The four corner directions, ordered top-left, top-right, bottom-right, bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumCorners {
    pub corners: [Vec3; 4],
}

impl FrustumCorners {
    /// Solve the corners for a vertical field of view (degrees) and aspect ratio
    pub fn solve(fov_degrees: f32, aspect: f32) -> Self {
        let tan_half = (fov_degrees * 0.5).to_radians().tan();

        let forward = Vec3::NEG_Z;
        let to_right = Vec3::X * tan_half * aspect;
        let to_top = Vec3::Y * tan_half;

        Self {
            corners: [
                forward - to_right + to_top,
                forward + to_right + to_top,
                forward + to_right - to_top,
                forward - to_right - to_top,
            ],
        }
    }

    pub fn corner(&self, corner: Corner) -> Vec3 {
        self.corners[corner.index() as usize]
    }

    /// Pack into a 4x4 matrix whose i-th vec4 is corner `i` with w = 0
    ///
    /// WGSL addresses a `mat4x4` by column, so `frustum_corners[i]` in the
    /// shader yields corner `i`.
    pub fn to_matrix(&self) -> Mat4 {
        let [tl, tr, br, bl] = self.corners;
        Mat4::from_cols(
            tl.extend(0.0),
            tr.extend(0.0),
            br.extend(0.0),
            bl.extend(0.0),
        )
    }
}
