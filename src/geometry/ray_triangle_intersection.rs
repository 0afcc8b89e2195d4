use crate::geometry::{FloatType, Ray};

use super::{BarycentricCoordinates, Triangle, WorldPoint};

impl Triangle<WorldPoint> {
    /// Calculates ray intersection with the (two sided) triangle.
    /// Returns distance along the ray and barycentric coordinates of the hit, if the hit is
    /// inside the triangle and inside the closed interval of the ray.
    ///
    /// Solves `v0 + beta * (v1 - v0) + gamma * (v2 - v0) = origin + t * direction`
    /// using Cramer's rule (Fundamentals of Computer Graphics, 4.4.2).
    /// A ray parallel to the triangle makes the determinant zero, the resulting infinities and
    /// NaNs get rejected by the range comparisons below.
    pub fn intersect(&self, ray: &Ray) -> Option<(FloatType, BarycentricCoordinates)> {
        let e1 = self[0] - self[1];
        let e2 = self[0] - self[2];
        let s = self[0] - ray.origin;

        let e2_cross_d = e2.cross(&ray.direction);
        let det = e1.dot(&e2_cross_d);
        let e1_cross_s = e1.cross(&s);

        let t = -e2.dot(&e1_cross_s) / det;
        if !ray.contains(t) {
            return None;
        }

        let gamma = ray.direction.dot(&e1_cross_s) / det;
        if !(gamma >= 0.0 && gamma <= 1.0) {
            return None;
        }

        let beta = s.dot(&e2_cross_d) / det;
        if !(beta >= 0.0 && beta <= 1.0 - gamma) {
            return None;
        }

        Some((t, BarycentricCoordinates::from_beta_gamma(beta, gamma)))
    }
}
