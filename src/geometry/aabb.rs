use num_traits::One;
use std::ops::Sub;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Scalar};

use super::{Axis, FloatType, WorldBox, WorldPoint};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl WorldBox {
    /// Box that contains nothing, neutral element of `union`.
    /// Its min is +inf and max -inf, so it breaks the usual min <= max invariant.
    pub fn empty() -> WorldBox {
        WorldBox {
            min: WorldPoint::from([FloatType::INFINITY; 3]),
            max: WorldPoint::from([FloatType::NEG_INFINITY; 3]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(a, b)| a > b)
    }

    /// Smallest box enclosing all the points, None if the iterator is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut ret = WorldBox::new(*first, *first);
        for p in iter {
            ret.include_point(p);
        }
        Some(ret)
    }

    pub fn include_point(&mut self, p: &WorldPoint) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn union(&self, other: &WorldBox) -> WorldBox {
        WorldBox::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    pub fn contains_point(&self, p: &WorldPoint) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    pub fn contains_box(&self, other: &WorldBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    pub fn volume(&self) -> FloatType {
        if self.is_empty() {
            0.0
        } else {
            self.size().product()
        }
    }

    /// Axis with the largest extent. Ties prefer X, then Y, then Z.
    pub fn widest_axis(&self) -> Axis {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            Axis::X
        } else if size.y >= size.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}
