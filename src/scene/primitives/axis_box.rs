use nalgebra::Unit;

use super::unit_fraction;
use crate::geometry::{
    Axis, FloatType, HitRecord, Ray, RayIntersectionExt, TexturePoint, WorldBox, WorldPoint,
    WorldVector,
};
use crate::scene::{Object, PrimitiveBounds};

/// Axis aligned solid box.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisBox {
    pub bounding_box: WorldBox,
}

impl AxisBox {
    /// Box spanned by two opposite corners, in any order.
    pub fn new(a: WorldPoint, b: WorldPoint) -> AxisBox {
        AxisBox {
            bounding_box: WorldBox::new(a.inf(&b), a.sup(&b)),
        }
    }

    pub fn corners(&self) -> [WorldPoint; 8] {
        let b = &self.bounding_box;
        std::array::from_fn(|i| {
            WorldPoint::new(
                if i & 4 == 0 { b.min.x } else { b.max.x },
                if i & 2 == 0 { b.min.y } else { b.max.y },
                if i & 1 == 0 { b.min.z } else { b.max.z },
            )
        })
    }

    /// Entry distance if it is inside the ray interval, otherwise the exit distance
    /// (ray starting inside the box).
    fn nearest_t(&self, ray: &Ray) -> Option<FloatType> {
        if ray.is_degenerate() {
            return None;
        }

        let (t1, t2) = self.bounding_box.intersect(ray);
        if !(t1 <= t2) {
            return None;
        }

        if ray.contains(t1) {
            Some(t1)
        } else if ray.contains(t2) {
            Some(t2)
        } else {
            None
        }
    }

    /// Face plane closest to the point, as axis and whether it is the max side.
    fn closest_face(&self, point: &WorldPoint) -> (Axis, bool) {
        let b = &self.bounding_box;
        let mut best = (Axis::X, false);
        let mut best_distance = FloatType::INFINITY;
        for axis in Axis::ALL {
            let i = axis.index();
            for (is_max, plane) in [(false, b.min[i]), (true, b.max[i])] {
                let distance = (point[i] - plane).abs();
                if distance < best_distance {
                    best_distance = distance;
                    best = (axis, is_max);
                }
            }
        }
        best
    }
}

impl Object for AxisBox {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let t = self.nearest_t(ray)?;
        let point = ray.point_at(t);

        let (axis, is_max) = self.closest_face(&point);
        let mut normal = WorldVector::zeros();
        normal[axis.index()] = if is_max { 1.0 } else { -1.0 };

        let size = self.bounding_box.size();
        let [u_axis, v_axis] = axis.others().map(Axis::index);
        let texture_coords = TexturePoint::new(
            unit_fraction(point[u_axis], self.bounding_box.min[u_axis], size[u_axis]),
            unit_fraction(point[v_axis], self.bounding_box.min[v_axis], size[v_axis]),
        )
        .map(|x| x.clamp(0.0, 1.0));

        Some(HitRecord {
            t,
            point,
            normal: Unit::new_unchecked(normal),
            texture_coords,
        })
    }

    fn hits(&self, ray: &Ray) -> bool {
        self.nearest_t(ray).is_some()
    }

    fn bounds(&self) -> PrimitiveBounds {
        let corners = self.corners();
        let mut bounding_box = WorldBox::empty();
        let mut sum = WorldVector::zeros();
        for corner in &corners {
            bounding_box.include_point(corner);
            sum += corner.coords;
        }
        PrimitiveBounds {
            bounding_box,
            average_position: WorldPoint::from(sum / corners.len() as FloatType),
        }
    }
}
