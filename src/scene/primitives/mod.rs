mod axis_box;
mod cylinder;
mod mesh;
mod sphere;

use crate::geometry::{FloatType, HitRecord, Ray};

use super::{Object, PrimitiveBounds};

pub use axis_box::AxisBox;
pub use cylinder::Cylinder;
pub use mesh::{Mesh, MeshError, MeshTriangle, TextureCoordMode};
pub use sphere::Sphere;

/// Closed set of supported primitives.
#[derive(Clone, Debug)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(MeshTriangle),
    Box(AxisBox),
    Cylinder(Cylinder),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $e:expr) => {
        match $self {
            Primitive::Sphere($inner) => $e,
            Primitive::Triangle($inner) => $e,
            Primitive::Box($inner) => $e,
            Primitive::Cylinder($inner) => $e,
        }
    };
}

impl Object for Primitive {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        dispatch!(self, p => p.intersect(ray))
    }

    fn hits(&self, ray: &Ray) -> bool {
        dispatch!(self, p => p.hits(ray))
    }

    fn bounds(&self) -> PrimitiveBounds {
        dispatch!(self, p => p.bounds())
    }
}

impl From<Sphere> for Primitive {
    fn from(value: Sphere) -> Self {
        Primitive::Sphere(value)
    }
}

impl From<MeshTriangle> for Primitive {
    fn from(value: MeshTriangle) -> Self {
        Primitive::Triangle(value)
    }
}

impl From<AxisBox> for Primitive {
    fn from(value: AxisBox) -> Self {
        Primitive::Box(value)
    }
}

impl From<Cylinder> for Primitive {
    fn from(value: Cylinder) -> Self {
        Primitive::Cylinder(value)
    }
}

/// Position of `value` within `[min, min + extent]` remapped to `[0, 1]`.
/// Zero extent maps to the middle.
fn unit_fraction(value: FloatType, min: FloatType, extent: FloatType) -> FloatType {
    if extent > 0.0 {
        (value - min) / extent
    } else {
        0.5
    }
}
