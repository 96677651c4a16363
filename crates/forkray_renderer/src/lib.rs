//! forkray renderer - CPU Monte Carlo ray tracing
//!
//! Analytic primitives (spheres, a ground plane, axis-aligned panels),
//! a small shading model with point-light or hemisphere lighting, and a
//! renderer that splits the image into rows across a fixed pool of
//! worker threads.
//!
//! Randomness comes from the splittable [`Rng`]: one stream per row,
//! pixel and sample, forked from a single seed. A render is therefore
//! reproducible bit for bit whatever the thread count.

mod camera;
mod material;
mod primitive;
mod renderer;
mod scene;
pub mod scenes;
mod tracer;

pub use camera::Camera;
pub use material::{Color, Material, GLOSS_JITTER, SURFACE_EPSILON};
pub use primitive::{is_nearer, Axis, Facing, Panel, Primitive, MISS};
pub use renderer::{render, render_pixel, render_row, RenderError, RenderOutput, RenderResult};
pub use scene::{Background, Entry, Hit, Lighting, Scene};
pub use scenes::{ScenePreset, UnknownScene};
pub use tracer::{SceneTracer, Tracer};

/// Re-export math and config types used in this crate's API
pub use forkray_core::{ApertureShape, Image, RenderConfig};
pub use forkray_math::{Ray, Rng, Vec2, Vec3};
