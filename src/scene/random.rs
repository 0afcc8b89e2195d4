//! Seeded random scenes, for testing and benchmarking.

use std::sync::Arc;

use rand::Rng;

use super::{AxisBox, Cylinder, Mesh, Primitive, Sphere};
use crate::geometry::{Axis, FloatType, Ray, WorldPoint, WorldVector};

fn random_point(rng: &mut impl Rng, extent: FloatType) -> WorldPoint {
    WorldPoint::new(
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
    )
}

fn random_vector(rng: &mut impl Rng, min: FloatType, max: FloatType) -> WorldVector {
    WorldVector::new(
        rng.random_range(min..max),
        rng.random_range(min..max),
        rng.random_range(min..max),
    )
}

/// Random mix of spheres, boxes, cylinders and triangles of a single mesh,
/// inside a cube of half size `extent` (give or take the primitive sizes).
/// Triangles come last.
pub fn random_scene(rng: &mut impl Rng, count: usize, extent: FloatType) -> Vec<Primitive> {
    let mut primitives: Vec<Primitive> = Vec::with_capacity(count);
    let mut triangle_positions = Vec::new();
    while primitives.len() + triangle_positions.len() / 3 < count {
        match rng.random_range(0..4) {
            0 => {
                let center = random_point(rng, extent);
                primitives.push(Sphere::new(center, rng.random_range(0.1..2.0)).into());
            }
            1 => {
                let a = random_point(rng, extent);
                let size = random_vector(rng, 0.1, 3.0);
                primitives.push(AxisBox::new(a, a + size).into());
            }
            2 => {
                let axis = Axis::ALL[rng.random_range(0..3)];
                let center = random_point(rng, extent);
                let radius = rng.random_range(0.1..1.5);
                let height = rng.random_range(0.1..4.0);
                primitives.push(Cylinder::new(center, radius, height).with_axis(axis).into());
            }
            _ => {
                let a = random_point(rng, extent);
                for _ in 0..3 {
                    triangle_positions.push(a + random_vector(rng, -2.0, 2.0));
                }
            }
        }
    }

    let face_count = triangle_positions.len() / 3;
    let mesh = Mesh::builder()
        .positions(triangle_positions)
        .faces((0..face_count).map(|i| [3 * i, 3 * i + 1, 3 * i + 2].into()).collect())
        .build();
    // Every face indexes its own three vertices
    if let Ok(mesh) = mesh {
        primitives.extend(Arc::new(mesh).triangles().map(Primitive::from));
    }
    primitives
}

/// Random ray starting somewhere around a scene of the given extent, pointing into it.
pub fn random_ray(rng: &mut impl Rng, extent: FloatType) -> Ray {
    let origin = random_point(rng, 2.0 * extent);
    let target = random_point(rng, extent);
    Ray::new(origin, target - origin)
}

/// Like `random_ray`, with a finite interval. `t == 1` is inside the scene,
/// the interval is somewhere within `[0, 3]`.
pub fn random_bounded_ray(rng: &mut impl Rng, extent: FloatType) -> Ray {
    let ray = random_ray(rng, extent);
    let start = rng.random_range(0.0..1.0);
    let end = start + rng.random_range(0.0..2.0);
    Ray::with_range(ray.origin, ray.direction, start, end)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scene::Object;
    use assert2::assert;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn exact_count_with_every_kind() {
        let mut rng = SmallRng::seed_from_u64(3);
        let scene = random_scene(&mut rng, 400, 10.0);
        assert!(scene.len() == 400);
        assert!(scene.iter().any(|p| matches!(p, Primitive::Sphere(_))));
        assert!(scene.iter().any(|p| matches!(p, Primitive::Box(_))));
        assert!(scene.iter().any(|p| matches!(p, Primitive::Cylinder(_))));
        assert!(scene.iter().any(|p| matches!(p, Primitive::Triangle(_))));
    }

    #[test]
    fn same_seed_same_scene() {
        let a = random_scene(&mut SmallRng::seed_from_u64(11), 50, 10.0);
        let b = random_scene(&mut SmallRng::seed_from_u64(11), 50, 10.0);
        let bounds = |scene: &[Primitive]| scene.iter().map(Object::bounds).collect::<Vec<_>>();
        assert!(bounds(&a) == bounds(&b));
    }

    #[test]
    fn rays_are_not_degenerate() {
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..100 {
            assert!(!random_ray(&mut rng, 5.0).is_degenerate());
            assert!(!random_bounded_ray(&mut rng, 5.0).is_degenerate());
        }
    }

    #[test]
    fn bounded_rays_have_finite_interval() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..100 {
            let ray = random_bounded_ray(&mut rng, 5.0);
            assert!(0.0 <= ray.start);
            assert!(ray.start <= ray.end);
            assert!(ray.end < 3.0);
        }
    }
}
