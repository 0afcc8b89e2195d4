pub mod bvh;
pub mod primitives;
pub mod random;

use crate::geometry::{HitRecord, Ray, WorldBox, WorldPoint};

pub use bvh::{Bvh, BvhSettings, BvhStatistics, TraversalStats};
pub use primitives::{
    AxisBox, Cylinder, Mesh, MeshError, MeshTriangle, Primitive, Sphere, TextureCoordMode,
};

/// Renderable object
pub trait Object: Send + Sync {
    /// Nearest intersection with the ray inside the ray's closed interval.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord>;

    /// Answers only whether there is any intersection in the ray's interval.
    /// Must agree with `intersect(ray).is_some()`, implementations only skip building the record.
    fn hits(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    fn bounds(&self) -> PrimitiveBounds;
}

/// Derived spatial data of a primitive, used for BVH construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveBounds {
    pub bounding_box: WorldBox,
    /// Representative position of the primitive for spatial sorting.
    /// Always inside the bounding box.
    pub average_position: WorldPoint,
}

index_vec::define_index_type! {
    /// Index of a primitive in the array the BVH was built from.
    pub struct PrimitiveIdx = u32;
}

/// Intersection of a ray with one primitive of a primitive array.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    pub primitive: PrimitiveIdx,
    pub record: HitRecord,
}

/// Nearest intersection by testing every primitive, reference for the accelerated path.
/// Only strictly closer hits replace an earlier one, so ties go to the lower index.
pub fn linear_intersect<O: Object>(primitives: &[O], ray: &Ray) -> Option<Intersection> {
    if ray.is_degenerate() {
        return None;
    }

    let mut best: Option<Intersection> = None;
    let mut ray = *ray;
    for (i, primitive) in primitives.iter().enumerate() {
        if let Some(record) = primitive.intersect(&ray) {
            if best.as_ref().is_none_or(|b| record.t < b.record.t) {
                ray = ray.with_end(record.t);
                best = Some(Intersection {
                    primitive: PrimitiveIdx::from_usize(i),
                    record,
                });
            }
        }
    }
    best
}

/// Whether the ray hits anything, by testing every primitive.
pub fn linear_intersects<O: Object>(primitives: &[O], ray: &Ray) -> bool {
    !ray.is_degenerate() && primitives.iter().any(|p| p.hits(ray))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::WorldVector;
    use assert2::{assert, let_assert};
    use rand::{SeedableRng, rngs::SmallRng};

    use random::random_scene;

    #[test]
    fn linear_intersect_picks_nearest() {
        let primitives = vec![
            Sphere::new(WorldPoint::new(0.0, 0.0, 10.0), 1.0),
            Sphere::new(WorldPoint::new(0.0, 0.0, 5.0), 1.0),
            Sphere::new(WorldPoint::new(0.0, 0.0, 20.0), 1.0),
        ];
        let ray = Ray::new(WorldPoint::origin(), WorldVector::z());

        let_assert!(Some(hit) = linear_intersect(&primitives, &ray));
        assert!(hit.primitive == PrimitiveIdx::from_usize(1));
        assert!((hit.record.t - 4.0).abs() < 1e-12);
        assert!(linear_intersects(&primitives, &ray));
    }

    #[test]
    fn linear_intersect_ties_go_to_first() {
        let primitives = vec![
            Sphere::new(WorldPoint::new(0.0, 0.0, 5.0), 1.0),
            Sphere::new(WorldPoint::new(0.0, 0.0, 5.0), 1.0),
        ];
        let ray = Ray::new(WorldPoint::origin(), WorldVector::z());

        let_assert!(Some(hit) = linear_intersect(&primitives, &ray));
        assert!(hit.primitive == PrimitiveIdx::from_usize(0));
    }

    #[test]
    fn linear_intersect_degenerate_ray() {
        let primitives = vec![Sphere::new(WorldPoint::origin(), 1.0)];
        let ray = Ray::new(WorldPoint::origin(), WorldVector::zeros());
        assert!(linear_intersect(&primitives, &ray).is_none());
        assert!(!linear_intersects(&primitives, &ray));
    }

    #[test]
    fn random_scene_bounds_are_consistent() {
        let mut rng = SmallRng::seed_from_u64(7);
        for primitive in random_scene(&mut rng, 200, 20.0) {
            let bounds = primitive.bounds();
            assert!(!bounds.bounding_box.is_empty());
            assert!(bounds.bounding_box.contains_point(&bounds.average_position));
        }
    }
}
