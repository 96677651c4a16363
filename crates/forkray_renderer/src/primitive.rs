//! Analytic surfaces: spheres, the ground plane and axis-aligned panels.
//!
//! Every primitive answers two questions: how far along a ray it is hit,
//! and what its unit normal is at a point on its surface.
//!
//! Distances follow one convention throughout: a positive value is a hit
//! in front of the ray origin, measured in multiples of the ray direction;
//! anything else (negative, NaN) is a miss. Degenerate rays are not
//! special-cased. Dividing by a zero direction component yields infinity or
//! NaN, and [`is_nearer`] rejects both.

use forkray_math::{Ray, Vec2, Vec3};

/// Distance reported when a primitive is missed.
pub const MISS: f64 = -1.0;

/// Does a hit at `candidate` come before the current `best`?
///
/// Only positive distances are hits. A positive candidate always beats a
/// non-positive best; between two positive distances the strictly smaller
/// one wins, so ties keep the earlier hit. Every comparison with NaN is
/// false, so NaN never wins and never needs to be filtered beforehand.
#[inline]
pub fn is_nearer(candidate: f64, best: f64) -> bool {
    (candidate > 0.0 && best > 0.0 && candidate < best) || (candidate > 0.0 && best < 0.0)
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of `v` along this axis.
    #[inline]
    fn of(self, v: Vec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// The two remaining coordinates of `v`, in axis order.
    #[inline]
    fn others(self, v: Vec3) -> Vec2 {
        match self {
            Axis::X => Vec2::new(v.y, v.z),
            Axis::Y => Vec2::new(v.x, v.z),
            Axis::Z => Vec2::new(v.x, v.y),
        }
    }

    fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Which way a panel's normal points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Facing {
    /// The axis the panel is perpendicular to.
    pub fn axis(self) -> Axis {
        match self {
            Facing::PosX | Facing::NegX => Axis::X,
            Facing::PosY | Facing::NegY => Axis::Y,
            Facing::PosZ | Facing::NegZ => Axis::Z,
        }
    }

    /// Unit normal of a panel with this facing.
    pub fn normal(self) -> Vec3 {
        match self {
            Facing::PosX | Facing::PosY | Facing::PosZ => self.axis().unit(),
            Facing::NegX | Facing::NegY | Facing::NegZ => -self.axis().unit(),
        }
    }
}

/// A rectangle lying in the plane `axis = offset`.
///
/// `min` and `max` bound the two remaining coordinates in axis order:
/// (y, z) for X panels, (x, z) for Y panels, (x, y) for Z panels. The
/// bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub facing: Facing,
    pub offset: f64,
    pub min: Vec2,
    pub max: Vec2,
}

impl Panel {
    /// Create a panel. The corners may be given in any order.
    pub fn new(facing: Facing, offset: f64, a: Vec2, b: Vec2) -> Self {
        Self {
            facing,
            offset,
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn intersect(&self, ray: &Ray) -> f64 {
        let axis = self.facing.axis();
        let t = (self.offset - axis.of(ray.origin)) / axis.of(ray.direction);
        let p = axis.others(ray.at(t));
        // Written so that NaN coordinates fail the test.
        let inside = p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y;
        if inside {
            t
        } else {
            MISS
        }
    }
}

/// The closed set of surface shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere { center: Vec3, radius: f64 },
    /// Infinite horizontal plane `y = height`, facing up.
    Ground { height: f64 },
    Panel(Panel),
}

impl Primitive {
    pub fn sphere(center: Vec3, radius: f64) -> Self {
        Primitive::Sphere { center, radius }
    }

    pub fn ground(height: f64) -> Self {
        Primitive::Ground { height }
    }

    pub fn panel(facing: Facing, offset: f64, a: Vec2, b: Vec2) -> Self {
        Primitive::Panel(Panel::new(facing, offset, a, b))
    }

    /// Signed distance along `ray` to the surface; see the module docs for
    /// the sign convention.
    pub fn intersect(&self, ray: &Ray) -> f64 {
        match self {
            Primitive::Sphere { center, radius } => {
                let ec = ray.origin - *center;
                let a = ray.direction.dot(ray.direction);
                let b = 2.0 * ray.direction.dot(ec);
                let c = ec.dot(ec) - radius * radius;
                let disc = b * b - 4.0 * a * c;
                if disc < 0.0 {
                    return MISS;
                }
                // The near root. When the origin is inside the sphere it is
                // negative and the sphere is reported as a miss.
                (-b - disc.sqrt()) / (2.0 * a)
            }
            Primitive::Ground { height } => (height - ray.origin.y) / ray.direction.y,
            Primitive::Panel(panel) => panel.intersect(ray),
        }
    }

    /// Outward unit normal at `point`, which is assumed to lie on the surface.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Primitive::Sphere { center, .. } => (point - *center).normalize(),
            Primitive::Ground { .. } => Vec3::Y,
            Primitive::Panel(panel) => panel.facing.normal(),
        }
    }
}
