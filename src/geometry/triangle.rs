use std::ops::{Add, Index, Mul};

use super::{FloatType, WorldPoint, WorldVector};

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> From<[Point; 3]> for Triangle<Point> {
    fn from(value: [Point; 3]) -> Self {
        Triangle(value)
    }
}

impl Triangle<WorldPoint> {
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [WorldVector; 2] {
        [self[1] - self[0], self[2] - self[0]]
    }

    /// Returns a normal vector of the triangle, not normalized.
    /// Counter-clockwise winding faces the viewer.
    pub fn normal(&self) -> WorldVector {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }
}

/// Weights of the three triangle vertices, `alpha + beta + gamma == 1`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates {
    pub alpha: FloatType,
    pub beta: FloatType,
    pub gamma: FloatType,
}

impl BarycentricCoordinates {
    /// Constructs the coordinates from the weights of the second and third vertex.
    pub fn from_beta_gamma(beta: FloatType, gamma: FloatType) -> Self {
        BarycentricCoordinates {
            alpha: 1.0 - beta - gamma,
            beta,
            gamma,
        }
    }

    pub fn interpolate<T>(&self, a: T, b: T, c: T) -> T
    where
        T: Mul<FloatType, Output = T> + Add<Output = T>,
    {
        a * self.alpha + b * self.beta + c * self.gamma
    }

    pub fn interpolate_triangle<T>(&self, triangle: &Triangle<T>) -> T
    where
        T: Mul<FloatType, Output = T> + Add<Output = T> + Clone,
    {
        self.interpolate(
            triangle[0].clone(),
            triangle[1].clone(),
            triangle[2].clone(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn edges_and_normal() {
        let t = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
        );
        assert!(t.edges() == [WorldVector::x(), WorldVector::y()]);
        assert!(t.normal() == WorldVector::z());
    }

    #[test]
    fn weights_sum_to_one() {
        let bc = BarycentricCoordinates::from_beta_gamma(0.25, 0.5);
        assert!(bc.alpha == 0.25);
        assert!(bc.alpha + bc.beta + bc.gamma == 1.0);
    }

    #[test]
    fn interpolate_vertices() {
        let t = Triangle::new(
            WorldVector::new(1.0, 0.0, 0.0),
            WorldVector::new(0.0, 2.0, 0.0),
            WorldVector::new(0.0, 0.0, 4.0),
        );
        let bc = BarycentricCoordinates::from_beta_gamma(0.25, 0.25);
        assert!(bc.interpolate_triangle(&t) == WorldVector::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn map_indices() {
        let t = Triangle::new(0usize, 1, 2);
        let mapped = t.map(|i| i * 10);
        assert!(mapped.iter().copied().collect::<Vec<_>>() == vec![0, 10, 20]);
    }
}
