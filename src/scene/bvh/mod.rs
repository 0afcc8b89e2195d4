mod building;
mod ray_bvh_intersection;
mod statistics;

use std::ops::Range;

use index_vec::IndexVec;

use crate::geometry::WorldBox;

use super::{Object, Primitive, PrimitiveBounds, PrimitiveIdx};

pub use building::BvhSettings;
pub use ray_bvh_intersection::TraversalStats;
pub use statistics::BvhStatistics;

/// Binary bounding volume hierarchy over a set of primitives.
///
/// Primitives are kept in the order they were given in, the tree refers to them through
/// a permuted index array, so `PrimitiveIdx` values stay meaningful to the caller.
#[derive(Clone, Debug)]
pub struct Bvh<O = Primitive> {
    primitives: Vec<O>,
    bounds: IndexVec<PrimitiveIdx, PrimitiveBounds>,

    /// Primitive indices, reordered so that every leaf covers a contiguous range.
    order: Vec<PrimitiveIdx>,

    nodes: IndexVec<NodeIdx, Node>,
    /// None for an empty tree
    root: Option<NodeIdx>,
}

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Leaf {
        bounding_box: WorldBox,
        /// Range into `Bvh::order`
        range: Range<usize>,
    },
    Inner {
        bounding_box: WorldBox,
        children: [NodeIdx; 2],
    },
}

impl Node {
    fn bounding_box(&self) -> &WorldBox {
        match self {
            Node::Leaf { bounding_box, .. } => bounding_box,
            Node::Inner { bounding_box, .. } => bounding_box,
        }
    }
}

index_vec::define_index_type! {
    struct NodeIdx = u32;
}

impl<O: Object> Bvh<O> {
    pub fn primitives(&self) -> &[O] {
        &self.primitives
    }

    pub fn primitive(&self, index: PrimitiveIdx) -> &O {
        &self.primitives[index.index()]
    }

    /// Bounds of a primitive, as computed during the build.
    pub fn primitive_bounds(&self, index: PrimitiveIdx) -> &PrimitiveBounds {
        &self.bounds[index]
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Box enclosing the whole scene, None for an empty tree.
    pub fn bounding_box(&self) -> Option<&WorldBox> {
        self.root.map(|root| self.nodes[root].bounding_box())
    }

    /// Releases the primitives, in their original order.
    pub fn into_primitives(self) -> Vec<O> {
        self.primitives
    }
}
