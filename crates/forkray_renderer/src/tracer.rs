//! The "object that can trace rays" handed down through shading.

use forkray_math::{Ray, Rng};

use crate::{Color, Lighting, Scene};

/// Capability passed to [`Material::shade`](crate::Material::shade) so
/// shading can recurse without knowing about the scene or depth limit.
pub trait Tracer: Sync {
    /// Radiance arriving at the origin of `ray` from its direction.
    fn trace(&self, rng: &mut Rng, ray: &Ray, level: u32) -> Color;

    /// Is the segment from `shadow.at(0)` to `shadow.at(1)` blocked?
    fn occluded(&self, shadow: &Ray) -> bool;

    fn lighting(&self) -> &Lighting;
}

/// Depth-bounded tracer over a [`Scene`].
#[derive(Debug, Clone, Copy)]
pub struct SceneTracer<'a> {
    scene: &'a Scene,
    max_depth: u32,
}

impl<'a> SceneTracer<'a> {
    /// Levels `0..=max_depth` are shaded; deeper levels return black.
    pub fn new(scene: &'a Scene, max_depth: u32) -> Self {
        Self { scene, max_depth }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl Tracer for SceneTracer<'_> {
    fn trace(&self, rng: &mut Rng, ray: &Ray, level: u32) -> Color {
        // Deliberate energy cutoff, not an error.
        if level > self.max_depth {
            return Color::ZERO;
        }
        let hit = self.scene.intersect(ray);
        match hit.entry {
            None => self.scene.background().color(ray),
            Some(entry) => {
                entry
                    .material
                    .shade(rng, self, &entry.primitive, ray, hit.distance, level)
            }
        }
    }

    fn occluded(&self, shadow: &Ray) -> bool {
        self.scene.occluded(shadow)
    }

    fn lighting(&self) -> &Lighting {
        self.scene.lighting()
    }
}
