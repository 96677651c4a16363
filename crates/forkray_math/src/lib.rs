//! Math primitives for forkray.
//!
//! Double precision vectors (re-exported from glam), rays, intervals,
//! the camera basis, the splittable random source and the sampling
//! helpers built on top of it.

pub use glam::{DVec2 as Vec2, DVec3 as Vec3};

mod basis;
mod interval;
mod random;
mod ray;
pub mod sampling;

pub use basis::Basis;
pub use interval::Interval;
pub use random::Rng;
pub use ray::Ray;

/// Reflect `incident` about `normal`.
///
/// `normal` must be a unit vector; `incident` may have any length and the
/// result keeps it.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Fractional part, always in [0, 1) for finite input.
#[inline]
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}
