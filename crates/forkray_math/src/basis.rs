use crate::Vec3;

/// Orthonormal view basis built from an eye position and a look-at target.
///
/// `up` is recomputed as `right × forward`, so the frame stays orthonormal
/// whatever world up is used to derive `right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Build the basis for a camera at `eye` looking at `target`, with +Y as world up.
    ///
    /// Looking straight up or down leaves +Y parallel to `forward`; +Z is
    /// used as world up instead, so `right` is +X or -X there.
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or_else(|| forward.cross(Vec3::Z).normalize());
        let up = right.cross(forward);
        Self { forward, right, up }
    }

    /// Map view-plane coordinates to a (non-normalized) world direction.
    #[inline]
    pub fn direction(&self, u: f64, v: f64) -> Vec3 {
        self.forward + self.right * u + self.up * v
    }
}
