//! Warping uniform random numbers onto discs, squares and hemispheres.

use std::f64::consts::{FRAC_PI_4, PI};

use crate::{Rng, Vec2, Vec3};

/// Uniform point in the unit disc using the polar transform.
///
/// `r = sqrt(u)`, `theta = 2 pi v`. Consumes exactly two draws.
pub fn uniform_disc(rng: &mut Rng) -> Vec2 {
    let u = rng.rand();
    let v = rng.rand();
    polar_disc(u, v)
}

/// Map a point of the unit square onto the unit disc, preserving area.
pub fn polar_disc(u: f64, v: f64) -> Vec2 {
    let r = u.sqrt();
    let (sin, cos) = (2.0 * PI * v).sin_cos();
    Vec2::new(r * cos, r * sin)
}

/// Uniform point in the unit disc by rejection from the enclosing square.
///
/// Consumes an even, unbounded number of draws (4/pi pairs on average).
pub fn uniform_disc_rejection(rng: &mut Rng) -> Vec2 {
    loop {
        let p = uniform_square(rng);
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}

/// Uniform point in the unit disc using Shirley's concentric mapping.
pub fn uniform_disc_concentric(rng: &mut Rng) -> Vec2 {
    let p = uniform_square(rng);
    if p == Vec2::ZERO {
        return p;
    }
    let (r, theta) = if p.x.abs() > p.y.abs() {
        (p.x, FRAC_PI_4 * (p.y / p.x))
    } else {
        (p.y, 2.0 * FRAC_PI_4 - FRAC_PI_4 * (p.x / p.y))
    };
    let (sin, cos) = theta.sin_cos();
    Vec2::new(r * cos, r * sin)
}

/// Uniform point in the square [-1, 1) x [-1, 1).
pub fn uniform_square(rng: &mut Rng) -> Vec2 {
    let x = rng.rand() * 2.0 - 1.0;
    let y = rng.rand() * 2.0 - 1.0;
    Vec2::new(x, y)
}

/// Cosine-weighted direction on the hemisphere around unit `normal`.
///
/// A uniform disc point is lifted onto the hemisphere (Malley's method),
/// so the density is `cos(theta) / pi`.
pub fn cosine_hemisphere(rng: &mut Rng, normal: Vec3) -> Vec3 {
    let d = uniform_disc(rng);
    let z = (1.0 - d.length_squared()).max(0.0).sqrt();
    let (tangent, bitangent) = normal.any_orthonormal_pair();
    tangent * d.x + bitangent * d.y + normal * z
}
