//! Scene: an ordered list of (primitive, material) entries plus lighting.

use std::sync::Arc;

use forkray_math::{Interval, Ray, Vec2, Vec3};

use crate::primitive::{is_nearer, Facing, MISS};
use crate::{Color, Material, Primitive};

/// Where diffuse light comes from.
///
/// The two strategies are mutually exclusive: a scene either has one
/// point light sampled with shadow rays, or gathers light by sampling the
/// hemisphere and tracing recursively (lit by emissive surfaces).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lighting {
    PointLight { position: Vec3 },
    Hemisphere,
}

/// Color returned for rays that hit nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Vertical blue gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => Color::new(0.1, 0.2, 0.3) + ray.direction.y * Color::splat(0.2),
        }
    }
}

/// One surface in the scene.
#[derive(Debug, Clone)]
pub struct Entry {
    pub primitive: Primitive,
    pub material: Arc<Material>,
}

/// Result of a nearest-hit query. `entry` is `None` on a miss.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub distance: f64,
    pub entry: Option<&'a Entry>,
}

impl Hit<'_> {
    pub fn is_miss(&self) -> bool {
        self.entry.is_none()
    }
}

/// Owns every primitive of the scene.
///
/// Entries are only ever appended, and only before rendering starts; the
/// renderer borrows the scene immutably from all threads.
#[derive(Debug, Clone)]
pub struct Scene {
    entries: Vec<Entry>,
    lighting: Lighting,
    background: Background,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(lighting: Lighting, background: Background) -> Self {
        Self {
            entries: Vec::new(),
            lighting,
            background,
        }
    }

    /// Append a primitive. Returns its entry index.
    pub fn add(&mut self, primitive: Primitive, material: &Arc<Material>) -> usize {
        self.entries.push(Entry {
            primitive,
            material: Arc::clone(material),
        });
        self.entries.len() - 1
    }

    /// Six panels enclosing the box `min..max`, facing inward.
    pub fn add_room(&mut self, min: Vec3, max: Vec3, material: &Arc<Material>) {
        for (facing, offset) in [
            (Facing::PosX, min.x),
            (Facing::NegX, max.x),
            (Facing::PosY, min.y),
            (Facing::NegY, max.y),
            (Facing::PosZ, min.z),
            (Facing::NegZ, max.z),
        ] {
            self.add_face(facing, offset, min, max, material);
        }
    }

    /// Six panels around the box `min..max`, facing outward.
    pub fn add_box(&mut self, min: Vec3, max: Vec3, material: &Arc<Material>) {
        for (facing, offset) in [
            (Facing::NegX, min.x),
            (Facing::PosX, max.x),
            (Facing::NegY, min.y),
            (Facing::PosY, max.y),
            (Facing::NegZ, min.z),
            (Facing::PosZ, max.z),
        ] {
            self.add_face(facing, offset, min, max, material);
        }
    }

    fn add_face(&mut self, facing: Facing, offset: f64, min: Vec3, max: Vec3, material: &Arc<Material>) {
        let (a, b) = match facing {
            Facing::PosX | Facing::NegX => (Vec2::new(min.y, min.z), Vec2::new(max.y, max.z)),
            Facing::PosY | Facing::NegY => (Vec2::new(min.x, min.z), Vec2::new(max.x, max.z)),
            Facing::PosZ | Facing::NegZ => (Vec2::new(min.x, min.y), Vec2::new(max.x, max.y)),
        };
        self.add(Primitive::panel(facing, offset, a, b), material);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Nearest entry hit by `ray`, by linear scan.
    ///
    /// On a tie the entry added first wins.
    pub fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let mut best = Hit {
            distance: MISS,
            entry: None,
        };
        for entry in &self.entries {
            let d = entry.primitive.intersect(ray);
            if is_nearer(d, best.distance) {
                best = Hit {
                    distance: d,
                    entry: Some(entry),
                };
            }
        }
        best
    }

    /// Is anything hit strictly between the origin (0) and the end (1) of
    /// `shadow`?
    pub fn occluded(&self, shadow: &Ray) -> bool {
        let hit = self.intersect(shadow);
        !hit.is_miss() && Interval::SEGMENT.surrounds(hit.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Arc<Material> {
        Arc::new(Material::new().with_color(Color::splat(0.5)))
    }

    fn empty() -> Scene {
        Scene::new(Lighting::Hemisphere, Background::Solid(Color::ZERO))
    }

    #[test]
    fn test_nearest_of_two_spheres() {
        let mat = grey();
        let mut scene = empty();
        let far = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -10.0), 1.0), &mat);
        let near = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0), &mat);
        assert_ne!(far, near);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = scene.intersect(&ray);
        assert!((hit.distance - 4.0).abs() < 1e-12);
        assert!(std::ptr::eq(hit.entry.unwrap(), &scene.entries()[near]));
    }

    #[test]
    fn test_behind_never_beats_in_front() {
        let mat = grey();
        let mut scene = empty();
        // Behind the origin, listed first
        scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, 3.0), 1.0), &mat);
        let front = scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -50.0), 1.0), &mat);

        let hit = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert!((hit.distance - 49.0).abs() < 1e-9);
        assert!(std::ptr::eq(hit.entry.unwrap(), &scene.entries()[front]));
    }

    #[test]
    fn test_tie_keeps_first() {
        let a = grey();
        let b = Arc::new(Material::light(Color::ONE));
        let mut scene = empty();
        scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0), &a);
        scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0), &b);

        let hit = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert!(!hit.entry.unwrap().material.emissive);
    }

    #[test]
    fn test_miss() {
        let mut scene = empty();
        scene.add(Primitive::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0), &grey());

        let hit = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::Z));
        assert!(hit.is_miss());
        assert!(hit.distance < 0.0);

        assert!(empty().intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).is_miss());
    }

    #[test]
    fn test_degenerate_ray_misses() {
        let mut scene = empty();
        scene.add_room(Vec3::new(-3.0, 0.0, -3.0), Vec3::new(3.0, 2.0, 3.0), &grey());
        scene.add(Primitive::sphere(Vec3::new(0.0, 1.0, 0.0), 0.5), &grey());
        scene.add(Primitive::ground(0.0), &grey());

        let hit = scene.intersect(&Ray::new(Vec3::new(0.1, 1.0, 1.0), Vec3::ZERO));
        assert!(hit.is_miss());
    }

    #[test]
    fn test_shadow_interval_is_open() {
        let mut scene = empty();
        // Unit panel at z = -1 facing the origin
        scene.add(
            Primitive::panel(Facing::PosZ, -1.0, Vec2::splat(-1.0), Vec2::splat(1.0)),
            &grey(),
        );

        // Light beyond the panel: blocked at t = 0.5
        assert!(scene.occluded(&Ray::between(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0))));
        // Light exactly on the panel: t = 1, not blocked
        assert!(!scene.occluded(&Ray::between(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))));
        // Shadow ray starting on the panel: t = 0, not blocked
        assert!(!scene.occluded(&Ray::between(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 5.0))));
        // Light in front of the panel
        assert!(!scene.occluded(&Ray::between(Vec3::ZERO, Vec3::new(0.0, 0.0, -0.5))));
    }

    #[test]
    fn test_room_is_closed() {
        let mut scene = empty();
        scene.add_room(Vec3::new(-3.0, 0.0, -3.0), Vec3::new(3.0, 2.0, 3.0), &grey());
        assert_eq!(scene.len(), 6);

        let origin = Vec3::new(0.2, 1.0, -0.4);
        for dir in [
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
            Vec3::new(1.0, 0.3, -0.7),
        ] {
            let hit = scene.intersect(&Ray::new(origin, dir));
            let entry = hit.entry.expect("room should enclose the origin");
            let p = Ray::new(origin, dir).at(hit.distance);
            // Room normals face inward
            assert!(entry.primitive.normal(p).dot(dir) < 0.0);
        }
    }

    #[test]
    fn test_box_faces_outward() {
        let mut scene = empty();
        scene.add_box(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0), &grey());
        assert_eq!(scene.len(), 6);

        let ray = Ray::new(Vec3::new(0.0, 0.5, 5.0), Vec3::NEG_Z);
        let hit = scene.intersect(&ray);
        assert!((hit.distance - 4.0).abs() < 1e-12);
        assert_eq!(hit.entry.unwrap().primitive.normal(ray.at(hit.distance)), Vec3::Z);
    }

    #[test]
    fn test_materials_are_shared() {
        let wall = grey();
        let mut scene = empty();
        scene.add_room(Vec3::splat(-1.0), Vec3::splat(1.0), &wall);
        // Six entries plus our handle
        assert_eq!(Arc::strong_count(&wall), 7);
    }

    #[test]
    fn test_background() {
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(Background::Solid(Color::ONE).color(&up), Color::ONE);
        let sky = Background::Sky.color(&up);
        assert!((sky - Color::new(0.3, 0.4, 0.5)).length() < 1e-12);
    }
}
