use std::sync::Arc;

use bon::bon;
use nalgebra::Unit;
use thiserror::Error;

use crate::geometry::{HitRecord, Ray, TexturePoint, Triangle, WorldBox, WorldPoint, WorldVector};
use crate::scene::{Object, PrimitiveBounds};

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but the mesh only has {count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },
    #[error("mesh has {positions} vertex positions but {normals} normals")]
    NormalCountMismatch { positions: usize, normals: usize },
    #[error("mesh has {positions} vertex positions but {texture_coords} texture coordinates")]
    TextureCoordCountMismatch {
        positions: usize,
        texture_coords: usize,
    },
}

/// How per-vertex texture coordinates get blended at a hit point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextureCoordMode {
    /// Barycentric blend, rescaled to unit length afterwards.
    /// Known quirk, texture coordinates are not directions.
    #[default]
    Normalized,
    /// Plain barycentric blend.
    Barycentric,
}

/// Indexed triangle mesh with optional per-vertex normals and texture coordinates.
/// Per-vertex attributes share the indexing of positions.
#[derive(Debug)]
pub struct Mesh {
    positions: Vec<WorldPoint>,
    faces: Vec<Triangle<usize>>,
    normals: Option<Vec<WorldVector>>,
    texture_coords: Option<Vec<TexturePoint>>,
    texture_coord_mode: TextureCoordMode,
}

#[bon]
impl Mesh {
    #[builder]
    pub fn new(
        positions: Vec<WorldPoint>,
        faces: Vec<Triangle<usize>>,
        normals: Option<Vec<WorldVector>>,
        texture_coords: Option<Vec<TexturePoint>>,
        #[builder(default)] texture_coord_mode: TextureCoordMode,
    ) -> Result<Mesh, MeshError> {
        let count = positions.len();

        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= count) {
                return Err(MeshError::VertexIndexOutOfRange {
                    face: face_idx,
                    index,
                    count,
                });
            }
        }

        if let Some(normals) = normals.as_ref().filter(|n| n.len() != count) {
            return Err(MeshError::NormalCountMismatch {
                positions: count,
                normals: normals.len(),
            });
        }

        if let Some(texture_coords) = texture_coords.as_ref().filter(|tc| tc.len() != count) {
            return Err(MeshError::TextureCoordCountMismatch {
                positions: count,
                texture_coords: texture_coords.len(),
            });
        }

        Ok(Mesh {
            positions,
            faces,
            normals,
            texture_coords,
            texture_coord_mode,
        })
    }
}

impl Mesh {
    pub fn positions(&self) -> &[WorldPoint] {
        &self.positions
    }

    pub fn faces(&self) -> &[Triangle<usize>] {
        &self.faces
    }

    pub fn normals(&self) -> Option<&[WorldVector]> {
        self.normals.as_deref()
    }

    pub fn texture_coords(&self) -> Option<&[TexturePoint]> {
        self.texture_coords.as_deref()
    }

    pub fn texture_coord_mode(&self) -> TextureCoordMode {
        self.texture_coord_mode
    }

    /// One primitive per face, each keeping the mesh alive.
    pub fn triangles(self: &Arc<Self>) -> impl Iterator<Item = MeshTriangle> + '_ {
        (0..self.faces.len()).map(|face| MeshTriangle::new(Arc::clone(self), face))
    }
}

/// Single face of a mesh, usable as a standalone primitive.
#[derive(Clone, Debug)]
pub struct MeshTriangle {
    mesh: Arc<Mesh>,
    face: usize,
    positions: Triangle<WorldPoint>,
    /// Flat normal, used when the mesh has no vertex normals.
    normal: Unit<WorldVector>,
}

impl MeshTriangle {
    fn new(mesh: Arc<Mesh>, face: usize) -> MeshTriangle {
        let positions = mesh.faces[face].map(|&i| mesh.positions[i]);
        // Zero area triangles can't be hit from anywhere, any normal will do.
        let normal = Unit::try_new(positions.normal(), 0.0).unwrap_or(WorldVector::z_axis());
        MeshTriangle {
            mesh,
            face,
            positions,
            normal,
        }
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn face(&self) -> usize {
        self.face
    }

    pub fn positions(&self) -> &Triangle<WorldPoint> {
        &self.positions
    }

    pub fn flat_normal(&self) -> Unit<WorldVector> {
        self.normal
    }
}

impl Object for MeshTriangle {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let (t, bc) = self.positions.intersect(ray)?;
        let indices = &self.mesh.faces[self.face];

        let normal = self
            .mesh
            .normals
            .as_ref()
            .and_then(|normals| {
                let blended = bc.interpolate_triangle(&indices.map(|&i| normals[i]));
                Unit::try_new(blended, 0.0)
            })
            .unwrap_or(self.normal);

        let texture_coords = match &self.mesh.texture_coords {
            Some(texture_coords) => {
                let blended = bc.interpolate_triangle(&indices.map(|&i| texture_coords[i].coords));
                let blended = match self.mesh.texture_coord_mode {
                    TextureCoordMode::Normalized => blended.try_normalize(0.0).unwrap_or(blended),
                    TextureCoordMode::Barycentric => blended,
                };
                TexturePoint::from(blended)
            }
            None => TexturePoint::new(bc.beta, bc.gamma),
        };

        Some(HitRecord {
            t,
            point: ray.point_at(t),
            normal,
            texture_coords,
        })
    }

    fn hits(&self, ray: &Ray) -> bool {
        self.positions.intersect(ray).is_some()
    }

    fn bounds(&self) -> PrimitiveBounds {
        let mut bounding_box = WorldBox::empty();
        for p in self.positions.iter() {
            bounding_box.include_point(p);
        }
        PrimitiveBounds {
            average_position: bounding_box.center(),
            bounding_box,
        }
    }
}
