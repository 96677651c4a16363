//! Surface appearance and the recursive shading step.

use forkray_math::{fract, reflect, sampling, Ray, Rng, Vec3};

use crate::{Lighting, Primitive, Tracer};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// How far secondary rays start off the surface, along the normal.
pub const SURFACE_EPSILON: f64 = 1e-6;

/// Half-width of the per-axis normal jitter used for glossy reflection.
pub const GLOSS_JITTER: f64 = 0.015;

/// Darkening applied to the odd cells of the checker pattern.
const CHECKER_DARKEN: f64 = 0.5;

/// Appearance of a surface.
///
/// Materials are built once while the scene is composed and shared
/// read-only between scene entries and render threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Weight of direct (or one-bounce) diffuse light
    pub diffuse: f64,
    /// Weight of glossy mirror reflection
    pub reflection: f64,
    /// Constant term added regardless of lighting
    pub ambient: f64,
    /// Modulate diffuse light with a unit checkerboard on x/z
    pub checker: bool,
    /// Light source: returns `color` and stops the path
    pub emissive: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::ONE,
            diffuse: 1.0,
            reflection: 0.0,
            ambient: 0.0,
            checker: false,
            emissive: false,
        }
    }
}

impl Material {
    /// A white, fully diffuse material.
    pub fn new() -> Self {
        Self::default()
    }

    /// An emitter of the given color.
    pub fn light(color: Color) -> Self {
        Self {
            color,
            emissive: true,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the diffuse weight, clamped to [0, 1].
    pub fn with_diffuse(mut self, diffuse: f64) -> Self {
        self.diffuse = diffuse.clamp(0.0, 1.0);
        self
    }

    /// Set the reflection weight, clamped to [0, 1].
    pub fn with_reflection(mut self, reflection: f64) -> Self {
        self.reflection = reflection.clamp(0.0, 1.0);
        self
    }

    pub fn with_ambient(mut self, ambient: f64) -> Self {
        self.ambient = ambient.max(0.0);
        self
    }

    pub fn with_checker(mut self, checker: bool) -> Self {
        self.checker = checker;
        self
    }

    /// Color leaving the hit point at `ray.at(distance)` back along `ray`.
    ///
    /// Secondary rays go through `tracer` at `level + 1`; the tracer is
    /// responsible for cutting the recursion off.
    pub fn shade(
        &self,
        rng: &mut Rng,
        tracer: &dyn Tracer,
        primitive: &Primitive,
        ray: &Ray,
        distance: f64,
        level: u32,
    ) -> Color {
        if self.emissive {
            return self.color;
        }

        let mut out = self.color * self.ambient;
        if self.diffuse <= 0.0 && self.reflection <= 0.0 {
            return out;
        }

        let p = ray.at(distance);
        let normal = face_forward(primitive.normal(p), ray.direction);
        let origin = p + normal * SURFACE_EPSILON;

        if self.diffuse > 0.0 {
            let pattern = if self.checker { checker(p) } else { 1.0 };
            let incoming = match tracer.lighting() {
                Lighting::PointLight { position } => {
                    let shadow = Ray::between(origin, *position);
                    if tracer.occluded(&shadow) {
                        Color::ZERO
                    } else {
                        let shade = normal.dot((*position - p).normalize()).max(0.0);
                        Color::splat(shade)
                    }
                }
                Lighting::Hemisphere => {
                    let dir = sampling::cosine_hemisphere(rng, normal);
                    tracer.trace(rng, &Ray::new(origin, dir), level + 1)
                }
            };
            out += self.color * self.diffuse * pattern * incoming;
        }

        if self.reflection > 0.0 {
            let jitter = Vec3::new(
                rng.rand() - 0.5,
                rng.rand() - 0.5,
                rng.rand() - 0.5,
            ) * (2.0 * GLOSS_JITTER);
            let glossy_normal = (normal + jitter).normalize();
            let dir = reflect(ray.direction.normalize(), glossy_normal);
            let reflected = tracer.trace(rng, &Ray::new(origin, dir), level + 1);
            out += self.color * self.reflection * reflected;
        }

        out
    }
}

/// Flip `normal` so it faces against `incoming`.
#[inline]
fn face_forward(normal: Vec3, incoming: Vec3) -> Vec3 {
    if normal.dot(incoming) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Checkerboard factor for a point: unit cells on x/z, alternating
/// half-unit parity.
fn checker(p: Vec3) -> f64 {
    if (fract(p.x) < 0.5) ^ (fract(p.z) < 0.5) {
        CHECKER_DARKEN
    } else {
        1.0
    }
}
