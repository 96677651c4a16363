//! Built-in scenes.
//!
//! Each preset returns the scene together with the camera placement it
//! was composed for. Resolution and aperture are left at their defaults;
//! [`render`](crate::render) applies them from the render configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use forkray_math::{Vec2, Vec3};
use thiserror::Error;

use crate::primitive::Facing;
use crate::{Background, Camera, Color, Lighting, Material, Primitive, Scene};

/// Room shared by the indoor scenes: 6 x 2 x 6, floor at y = 0.
const ROOM_MIN: Vec3 = Vec3::new(-3.0, 0.0, -3.0);
const ROOM_MAX: Vec3 = Vec3::new(3.0, 2.0, 3.0);

/// Selects one of the built-in scenes by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePreset {
    /// A sphere over a checkered ground, lit by a point light under a sky
    #[default]
    Spheres,
    /// Room lit by a row of panels on one wall
    Gallery,
    /// Room lit by a ceiling panel, with a glossy sphere
    StillLife,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown scene '{0}' (expected spheres, gallery or still-life)")]
pub struct UnknownScene(pub String);

impl ScenePreset {
    pub const ALL: [ScenePreset; 3] = [Self::Spheres, Self::Gallery, Self::StillLife];

    pub fn name(self) -> &'static str {
        match self {
            Self::Spheres => "spheres",
            Self::Gallery => "gallery",
            Self::StillLife => "still-life",
        }
    }

    /// Build the scene and its camera.
    pub fn build(self) -> (Scene, Camera) {
        let (scene, camera) = match self {
            Self::Spheres => spheres(),
            Self::Gallery => gallery(),
            Self::StillLife => still_life(),
        };
        log::debug!("Built scene '{}' with {} primitives", self.name(), scene.len());
        (scene, camera)
    }
}

impl fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenePreset {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}

/// One shiny sphere on a checkered ground under a sky.
pub fn spheres() -> (Scene, Camera) {
    let mut scene = Scene::new(
        Lighting::PointLight {
            position: Vec3::new(5.0, 5.0, 5.0),
        },
        Background::Sky,
    );

    let ball = Arc::new(
        Material::new()
            .with_color(Color::new(0.6, 0.7, 0.8))
            .with_ambient(0.01)
            .with_diffuse(0.8)
            .with_reflection(0.3),
    );
    scene.add(Primitive::sphere(Vec3::new(0.0, 1.0, 0.0), 1.0), &ball);

    let ground = Arc::new(Material::new().with_color(Color::splat(0.5)).with_checker(true));
    scene.add(Primitive::ground(0.0), &ground);

    let camera = Camera::new(Vec3::new(0.0, 0.8, 2.0), Vec3::new(0.5, 1.0, 0.0));
    (scene, camera)
}

/// White room with a row of light panels along the +X wall, a line of
/// pillars in front of them and a red box.
pub fn gallery() -> (Scene, Camera) {
    let mut scene = Scene::new(Lighting::Hemisphere, Background::Solid(Color::ZERO));

    let wall = Arc::new(Material::new().with_color(Color::splat(0.9)));
    scene.add_room(ROOM_MIN, ROOM_MAX, &wall);

    let light = Arc::new(Material::light(Color::ONE));
    for i in 0..6 {
        let z = -2.5 + i as f64;
        scene.add(
            Primitive::panel(
                Facing::NegX,
                2.98,
                Vec2::new(0.1, z + 0.1),
                Vec2::new(1.5, z + 0.4),
            ),
            &light,
        );
    }

    let pillar = Arc::new(Material::new().with_color(Color::new(0.9, 0.9, 0.8)));
    scene.add_box(Vec3::new(-3.0, 0.0, -3.0), Vec3::new(-2.0, 2.0, -2.0), &pillar);
    for i in 0..7 {
        let z = -3.0 + i as f64;
        scene.add_box(Vec3::new(2.5, 0.0, z), Vec3::new(3.0, 2.0, z + 0.5), &pillar);
    }

    let red = Arc::new(Material::new().with_color(Color::new(1.0, 0.0, 0.0)));
    scene.add_box(Vec3::new(-0.7, 0.0, 0.0), Vec3::new(-0.2, 0.5, 0.5), &red);

    let camera = Camera::new(Vec3::new(-1.0, 1.0, 2.0), Vec3::new(0.0, 1.0, 0.0));
    (scene, camera)
}

/// White room with a ceiling light, three pillars, a red box and a
/// glossy sphere.
pub fn still_life() -> (Scene, Camera) {
    let mut scene = Scene::new(Lighting::Hemisphere, Background::Solid(Color::ZERO));

    let wall = Arc::new(Material::new().with_color(Color::splat(0.9)));
    scene.add_room(ROOM_MIN, ROOM_MAX, &wall);

    scene.add(
        Primitive::panel(
            Facing::NegY,
            1.98,
            Vec2::new(-0.2, -0.2),
            Vec2::new(1.6, 0.2),
        ),
        &Arc::new(Material::light(Color::ONE)),
    );

    let pillar = Arc::new(Material::new().with_color(Color::new(0.9, 0.9, 0.8)));
    scene.add_box(Vec3::new(-3.0, 0.0, -3.0), Vec3::new(-2.0, 2.0, -2.0), &pillar);
    scene.add_box(Vec3::new(2.5, 0.0, -3.0), Vec3::new(3.0, 2.0, -2.5), &pillar);
    scene.add_box(Vec3::new(2.0, 0.0, -1.0), Vec3::new(3.0, 2.0, 0.0), &pillar);

    let red = Arc::new(Material::new().with_color(Color::new(1.0, 0.0, 0.0)));
    scene.add_box(Vec3::new(-1.5, 0.0, 0.0), Vec3::new(-1.0, 0.5, 0.5), &red);

    let glossy = Arc::new(
        Material::new()
            .with_color(Color::new(0.7, 0.8, 0.9))
            .with_diffuse(0.2)
            .with_reflection(0.8),
    );
    scene.add(Primitive::sphere(Vec3::new(1.0, 0.5, 0.5), 0.5), &glossy);

    let camera = Camera::new(Vec3::new(0.0, 1.0, 2.0), Vec3::new(0.0, 1.0, 0.0));
    (scene, camera)
}
