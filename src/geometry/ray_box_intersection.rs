use crate::geometry::{FloatType, Ray, WorldBox};

/// Relative slack of `hits`, in multiples of the coordinate magnitudes involved.
/// Covers the rounding differences between the slab distances and the distances
/// computed by the primitive intersection routines.
pub const HIT_TOLERANCE: FloatType = 1e-9;

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);

    /// Does the ray touch the box anywhere inside its valid interval?
    /// Conservative, rays passing within `HIT_TOLERANCE` of the box count as hits.
    fn hits(&self, ray: &Ray) -> bool;
}

impl RayIntersectionExt for WorldBox {
    /// Calculates ray intersection with the box.
    /// Returns minimum and maximum distance along the ray, ray intersects if min <= max.
    /// The interval of the ray is not taken into account.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Componentwise distances along the ray to the box's min and max corners
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, FloatType::min);
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, FloatType::max);

        (componentwise_min_t.max(), componentwise_max_t.min())
    }

    fn hits(&self, ray: &Ray) -> bool {
        // Growing the box by the magnitude of the box and origin coordinates moves
        // every slab distance by at least HIT_TOLERANCE times its own magnitude.
        let pad = (self.min.coords.abs().sup(&self.max.coords.abs()) + ray.origin.coords.abs())
            * HIT_TOLERANCE;
        let padded = WorldBox::new(self.min - pad, self.max + pad);

        let (t1, t2) = padded.intersect(ray);
        t1.max(ray.start) <= t2.min(ray.end)
    }
}
