use std::f64::consts::PI;

use arrayvec::ArrayVec;
use nalgebra::Unit;

use super::unit_fraction;
use crate::geometry::{
    Axis, FloatType, HitRecord, Ray, TexturePoint, WorldBox, WorldPoint, WorldVector,
};
use crate::scene::{Object, PrimitiveBounds};

/// Closed cylinder aligned with one of the coordinate axes, centered on `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    pub center: WorldPoint,
    pub radius: FloatType,
    pub height: FloatType,
    pub axis: Axis,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Surface {
    Side,
    Cap { top: bool },
}

impl Cylinder {
    /// Cylinder along the Z axis.
    pub fn new(center: WorldPoint, radius: FloatType, height: FloatType) -> Cylinder {
        Cylinder {
            center,
            radius,
            height,
            axis: Axis::Z,
        }
    }

    pub fn with_axis(self, axis: Axis) -> Cylinder {
        Cylinder { axis, ..self }
    }

    fn half_height(&self) -> FloatType {
        0.5 * self.height
    }

    /// Every intersection of the ray with the side and both caps, unsorted and ignoring
    /// the ray interval.
    fn candidates(&self, ray: &Ray) -> ArrayVec<(FloatType, Surface), 4> {
        let mut ret = ArrayVec::new();

        let a = self.axis.index();
        let [u, v] = self.axis.others().map(Axis::index);
        let o = ray.origin - self.center;
        let d = &ray.direction;
        let half_height = self.half_height();
        let r2 = self.radius * self.radius;

        // Side: the 2D circle problem in the plane perpendicular to the axis.
        // Ray parallel to the axis gives qa == 0 and NaN roots, which fail the comparisons.
        let qa = d[u] * d[u] + d[v] * d[v];
        let qb = o[u] * d[u] + o[v] * d[v];
        let qc = o[u] * o[u] + o[v] * o[v] - r2;
        let discriminant = qb * qb - qa * qc;
        if discriminant >= 0.0 {
            let sqrt_disc = discriminant.sqrt();
            for t in [(-qb - sqrt_disc) / qa, (-qb + sqrt_disc) / qa] {
                if (o[a] + t * d[a]).abs() <= half_height {
                    ret.push((t, Surface::Side));
                }
            }
        }

        for top in [false, true] {
            let plane = if top { half_height } else { -half_height };
            let t = (plane - o[a]) / d[a];
            let pu = o[u] + t * d[u];
            let pv = o[v] + t * d[v];
            if pu * pu + pv * pv <= r2 {
                ret.push((t, Surface::Cap { top }));
            }
        }

        ret
    }

    fn nearest(&self, ray: &Ray) -> Option<(FloatType, Surface)> {
        if ray.is_degenerate() {
            return None;
        }

        self.candidates(ray)
            .into_iter()
            .filter(|(t, _)| ray.contains(*t))
            .min_by(|x, y| x.0.total_cmp(&y.0))
    }

    fn normal_and_texture_coords(
        &self,
        point: &WorldPoint,
        surface: Surface,
    ) -> (Unit<WorldVector>, TexturePoint) {
        let a = self.axis.index();
        let [u, v] = self.axis.others().map(Axis::index);
        let local = point - self.center;

        match surface {
            Surface::Side => {
                let mut radial = local;
                radial[a] = 0.0;
                let mut fallback = WorldVector::zeros();
                fallback[u] = 1.0;
                let normal = Unit::try_new(radial, 0.0).unwrap_or(Unit::new_unchecked(fallback));

                let angle = local[v].atan2(local[u]);
                let texture_coords = TexturePoint::new(
                    angle / (2.0 * PI) + 0.5,
                    unit_fraction(local[a], -self.half_height(), self.height),
                );
                (normal, texture_coords)
            }
            Surface::Cap { top } => {
                let mut normal = WorldVector::zeros();
                normal[a] = if top { 1.0 } else { -1.0 };

                let diameter = 2.0 * self.radius;
                let texture_coords = TexturePoint::new(
                    unit_fraction(local[u], -self.radius, diameter),
                    unit_fraction(local[v], -self.radius, diameter),
                );
                (Unit::new_unchecked(normal), texture_coords)
            }
        }
    }
}

impl Object for Cylinder {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let (t, surface) = self.nearest(ray)?;
        let point = ray.point_at(t);
        let (normal, texture_coords) = self.normal_and_texture_coords(&point, surface);

        Some(HitRecord {
            t,
            point,
            normal,
            texture_coords: texture_coords.map(|x| x.clamp(0.0, 1.0)),
        })
    }

    fn hits(&self, ray: &Ray) -> bool {
        self.nearest(ray).is_some()
    }

    fn bounds(&self) -> PrimitiveBounds {
        let a = self.axis.index();
        let [u, v] = self.axis.others().map(Axis::index);

        let mut bounding_box = WorldBox::empty();
        for i in 0..8 {
            let mut offset = WorldVector::zeros();
            offset[u] = if i & 4 == 0 { -self.radius } else { self.radius };
            offset[v] = if i & 2 == 0 { -self.radius } else { self.radius };
            offset[a] = if i & 1 == 0 {
                -self.half_height()
            } else {
                self.half_height()
            };
            bounding_box.include_point(&(self.center + offset));
        }

        PrimitiveBounds {
            bounding_box,
            average_position: self.center,
        }
    }
}
