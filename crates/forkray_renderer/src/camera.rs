//! Camera for primary ray generation.

use forkray_core::ApertureShape;
use forkray_math::{sampling, Basis, Ray, Rng, Vec2, Vec3};

/// Pinhole camera with optional thin-lens style depth of field.
///
/// The view plane spans `[-aspect, aspect] x [-1, 1]` at unit distance
/// along `forward`, so the vertical field of view is fixed at 90 degrees.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    eye: Vec3,
    look_at: Vec3,
    /// Point that stays sharp; only its distance from `eye` matters
    focus: Vec3,
    aperture: f64,
    aperture_shape: ApertureShape,

    basis: Basis,
    focal_distance: f64,
}

impl Camera {
    /// Camera at `eye` looking at `look_at`, focused on `look_at`, pinhole.
    pub fn new(eye: Vec3, look_at: Vec3) -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            eye,
            look_at,
            focus: look_at,
            aperture: 0.0,
            aperture_shape: ApertureShape::Disc,
            basis: Basis::look_at(eye, look_at),
            focal_distance: (look_at - eye).length(),
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set the point that is in focus.
    pub fn with_focus(mut self, focus: Vec3) -> Self {
        self.focus = focus;
        self.focal_distance = (focus - self.eye).length();
        self
    }

    /// Set lens size and shape. An aperture of 0 disables depth of field.
    pub fn with_aperture(mut self, aperture: f64, shape: ApertureShape) -> Self {
        self.aperture = aperture;
        self.aperture_shape = shape;
        self
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Map a (possibly fractional) pixel position to view-plane coordinates.
    ///
    /// The image height maps to [-1, 1]; pixel rows grow downward while the
    /// view-plane `v` grows upward.
    pub fn view_coords(&self, px: f64, py: f64) -> Vec2 {
        let half = Vec2::new(self.image_width as f64, self.image_height as f64) / 2.0;
        let p = (Vec2::new(px, py) - half) / half.y;
        Vec2::new(p.x, -p.y)
    }

    /// Generate a jittered primary ray for pixel (x, y).
    ///
    /// Draws, in order: two for the pixel jitter, two for the lens.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut Rng) -> Ray {
        // Antialiasing: jitter position within the pixel.
        let px = x as f64 + rng.rand();
        let py = y as f64 + rng.rand();
        let uv = self.view_coords(px, py);

        // Where the pinhole ray meets the focal plane.
        let dir = self.basis.direction(uv.x, uv.y).normalize();
        let focal_point = self.eye + dir * self.focal_distance;

        // Focal blur: move the origin across the lens, keep the focal point.
        let lens = self.lens_sample(rng) * self.aperture;
        let origin = self.eye + self.basis.right * lens.x + self.basis.up * lens.y;

        Ray::between(origin, focal_point)
    }

    fn lens_sample(&self, rng: &mut Rng) -> Vec2 {
        match self.aperture_shape {
            ApertureShape::Disc => sampling::uniform_disc(rng),
            ApertureShape::Rectangle => sampling::uniform_square(rng),
        }
    }
}
