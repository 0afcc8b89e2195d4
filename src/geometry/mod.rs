mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

use nalgebra::{Point2, Point3, Unit, Vector3};

pub use aabb::AABB;
pub use ray_box_intersection::RayIntersectionExt;
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f64;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;
pub type TexturePoint = Point2<FloatType>;

pub const EPSILON: FloatType = 1e-12;

/// Coordinate axis of the world space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two remaining axes, in cyclic order (X -> Y, Z; Y -> Z, X; Z -> X, Y).
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::Z, Axis::X],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray. Not normalized, `t` is measured in multiples of its length.
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,

    /// Closed interval of valid ray parameters, `[start, end]`.
    pub start: FloatType,
    pub end: FloatType,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray::with_range(origin, direction, 0.0, FloatType::INFINITY)
    }

    pub fn with_range(
        origin: WorldPoint,
        direction: WorldVector,
        start: FloatType,
        end: FloatType,
    ) -> Ray {
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
            start,
            end,
        }
    }

    /// Ray going from `from` (t = 0) to `to` (t = 1).
    pub fn segment(from: WorldPoint, to: WorldPoint) -> Ray {
        Ray::with_range(from, to - from, 0.0, 1.0)
    }

    /// Returns a copy of this ray with the end of the interval moved.
    pub fn with_end(&self, end: FloatType) -> Ray {
        Ray { end, ..*self }
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }

    /// Is `t` inside the closed interval `[start, end]`? NaN never is.
    pub fn contains(&self, t: FloatType) -> bool {
        t >= self.start && t <= self.end
    }

    /// Rays with zero or non-finite direction, or non-finite origin, can't hit anything.
    pub fn is_degenerate(&self) -> bool {
        self.direction.norm_squared() == 0.0
            || !self.direction.iter().all(|x| x.is_finite())
            || !self.origin.iter().all(|x| x.is_finite())
    }
}

/// Result of a single ray-primitive intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub t: FloatType,
    pub point: WorldPoint,
    pub normal: Unit<WorldVector>,
    pub texture_coords: TexturePoint,
}
