//! Simple ray tracer example.
//!
//! Builds a scene of small random spheres on a checkered ground and saves
//! it as PNG.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use forkray_renderer::{
    render, Background, Camera, Color, Lighting, Material, Primitive, RenderConfig, Scene, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let camera = Camera::new(Vec3::new(0.0, 1.5, 5.0), Vec3::new(0.0, 0.5, 0.0));
    let config = RenderConfig {
        width: 800,
        height: 450,
        samples: 16,
        ..RenderConfig::default()
    };

    let out = render(&scene, &camera, &config, &AtomicBool::new(false)).expect("render failed");
    println!("Rendered in {:?}", out.timings[0]);

    let filename = "output.png";
    out.image.save_png(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new(
        Lighting::PointLight {
            position: Vec3::new(-4.0, 6.0, 4.0),
        },
        Background::Sky,
    );

    let ground = Arc::new(Material::new().with_color(Color::splat(0.5)).with_checker(true));
    scene.add(Primitive::ground(0.0), &ground);

    let mirror = Arc::new(
        Material::new()
            .with_color(Color::new(0.7, 0.6, 0.5))
            .with_diffuse(0.1)
            .with_reflection(0.9),
    );
    scene.add(Primitive::sphere(Vec3::new(0.0, 1.0, 0.0), 1.0), &mirror);

    let mut rng = StdRng::seed_from_u64(42);
    for a in -4..4 {
        for b in -4..2 {
            let center = Vec3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Vec3::new(0.0, 0.2, 0.0)).length() < 1.3 {
                continue;
            }
            let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());
            let material = Material::new()
                .with_color(albedo)
                .with_ambient(0.05)
                .with_reflection(0.5 * rng.gen::<f64>());
            scene.add(Primitive::sphere(center, 0.2), &Arc::new(material));
        }
    }

    println!("Created {} objects", scene.len());
    scene
}
