use std::f64::consts::PI;

use nalgebra::Unit;

use crate::geometry::{FloatType, HitRecord, Ray, TexturePoint, WorldBox, WorldPoint, WorldVector};
use crate::scene::{Object, PrimitiveBounds};

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType) -> Sphere {
        Sphere { center, radius }
    }

    /// Both solutions of `|origin + t * direction - center|^2 = radius^2`, smaller first.
    fn roots(&self, ray: &Ray) -> Option<(FloatType, FloatType)> {
        let oc = ray.origin - self.center;
        let dd = ray.direction.dot(&ray.direction);
        let b = ray.direction.dot(&oc);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = b * b - dd * c;

        // Also rejects NaN
        if !(discriminant >= 0.0) {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        Some(((-b - sqrt_disc) / dd, (-b + sqrt_disc) / dd))
    }

    /// The closer root if it is inside the ray interval, otherwise the further one.
    fn nearest_t(&self, ray: &Ray) -> Option<FloatType> {
        let (t_neg, t_pos) = self.roots(ray)?;
        if ray.contains(t_neg) {
            Some(t_neg)
        } else if ray.contains(t_pos) {
            Some(t_pos)
        } else {
            None
        }
    }

    /// Latitude/longitude mapping of a unit direction from the center into [0, 1]^2.
    /// Longitude only covers the front half of the sphere, both hemispheres share it.
    fn texture_coords(direction: &WorldVector) -> TexturePoint {
        let theta = direction.y.clamp(-1.0, 1.0).asin();
        let cos_theta = theta.cos();
        let phi = if cos_theta > 0.0 {
            (direction.x / cos_theta).clamp(-1.0, 1.0).asin()
        } else {
            // Poles
            0.0
        };
        TexturePoint::new(theta / PI + 0.5, phi / (2.0 * PI) + 0.5)
    }
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.nearest_t(ray)?;
        let point = ray.point_at(t);
        let normal = Unit::try_new(point - self.center, 0.0)
            .unwrap_or_else(|| -Unit::new_normalize(ray.direction));

        Some(HitRecord {
            t,
            point,
            normal,
            texture_coords: Self::texture_coords(&normal),
        })
    }

    fn hits(&self, ray: &Ray) -> bool {
        self.nearest_t(ray).is_some()
    }

    fn bounds(&self) -> PrimitiveBounds {
        let r_vec = WorldVector::repeat(self.radius);
        PrimitiveBounds {
            bounding_box: WorldBox::new(self.center - r_vec, self.center + r_vec),
            average_position: self.center,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::{NonzeroWorldVectorWrapper, PositiveDistanceWrapper, WorldPointWrapper};
    use assert2::{assert, let_assert};
    use test_strategy::proptest;

    fn unit_sphere() -> Sphere {
        Sphere::new([1.0, 2.0, 3.0].into(), 1.0)
    }

    #[test]
    fn direct_hit_through_center() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        let_assert!(Some(h) = unit_sphere().intersect(&ray));
        assert!((h.t - 2.0).abs() < 1e-12);
        assert!((h.normal.into_inner() - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn grazing_hit() {
        let ray = Ray::new([2.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        let_assert!(Some(h) = unit_sphere().intersect(&ray));
        assert!((h.t - 3.0).abs() < 1e-12);
    }

    #[test]
    fn narrow_miss() {
        let ray = Ray::new([2.0, 2.01, 0.0].into(), [0.0, 0.0, 1.0].into());
        assert!(unit_sphere().intersect(&ray).is_none());
        assert!(!unit_sphere().hits(&ray));
    }

    #[test]
    fn unnormalized_direction() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), [0.0, 0.0, 4.0].into());
        let_assert!(Some(h) = unit_sphere().intersect(&ray));
        assert!((h.t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn inside_hits_far_side() {
        let ray = Ray::new([1.0, 2.0, 3.0].into(), [0.0, 0.0, 1.0].into());
        let_assert!(Some(h) = unit_sphere().intersect(&ray));
        assert!((h.t - 1.0).abs() < 1e-12);
        assert!((h.point - WorldPoint::new(1.0, 2.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn behind_misses() {
        let ray = Ray::new([1.0, 2.0, 5.0].into(), [0.0, 0.0, 1.0].into());
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn closed_interval_end() {
        let ray = Ray::with_range([1.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into(), 0.0, 2.0);
        let_assert!(Some(h) = unit_sphere().intersect(&ray));
        assert!(h.t == 2.0);
    }

    #[test]
    fn zero_direction_misses() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), WorldVector::zeros());
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn texture_coords() {
        let equator_front = Sphere::texture_coords(&WorldVector::new(0.0, 0.0, 1.0));
        assert!(equator_front == TexturePoint::new(0.5, 0.5));

        let north_pole = Sphere::texture_coords(&WorldVector::new(0.0, 1.0, 0.0));
        assert!((north_pole - TexturePoint::new(1.0, 0.5)).norm() < 1e-12);

        let side = Sphere::texture_coords(&WorldVector::new(1.0, 0.0, 0.0));
        assert!((side - TexturePoint::new(0.5, 0.75)).norm() < 1e-12);
    }

    #[proptest]
    fn texture_coords_in_unit_square(v: NonzeroWorldVectorWrapper) {
        let tc = Sphere::texture_coords(&v.normalize());
        assert!((0.0..=1.0).contains(&tc.x));
        assert!((0.0..=1.0).contains(&tc.y));
    }

    /// A ray through the center hits at distance r from the center, twice when the
    /// interval spans both intersections.
    #[proptest]
    fn ray_through_center_hits_twice(
        center: WorldPointWrapper,
        radius: PositiveDistanceWrapper,
        direction: NonzeroWorldVectorWrapper,
    ) {
        let sphere = Sphere::new(*center, *radius);
        let origin = *center - *direction * (3.0 * *radius / direction.norm());
        let ray = Ray::new(origin, *direction);

        let_assert!(Some(first) = sphere.intersect(&ray));
        let tolerance = 1e-6 * (1.0 + *radius + center.coords.norm());
        assert!(((first.point - *center).norm() - *radius).abs() < tolerance);

        let ray2 = Ray::with_range(origin, *direction, first.t + 1e-9 * first.t.abs().max(1.0), ray.end);
        let_assert!(Some(second) = sphere.intersect(&ray2));
        assert!(((second.point - *center).norm() - *radius).abs() < tolerance);
        assert!(second.t > first.t);
        assert!((second.point - first.point).norm() > *radius);
    }

    #[proptest]
    fn bounds_contain_average(center: WorldPointWrapper, radius: PositiveDistanceWrapper) {
        let b = Sphere::new(*center, *radius).bounds();
        assert!(b.bounding_box.contains_point(&b.average_position));
        assert!(b.average_position == *center);
        assert!((b.bounding_box.size() - WorldVector::repeat(2.0 * *radius)).norm() < 1e-9);
    }
}
