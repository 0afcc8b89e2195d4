use std::num::NonZeroUsize;
use std::ops::Range;

use index_vec::{IndexSlice, IndexVec};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::geometry::WorldBox;
use crate::scene::{Object, PrimitiveBounds, PrimitiveIdx};

use super::{Bvh, Node, NodeIdx};

/// Parameters of the BVH construction.
#[derive(Clone, Debug, PartialEq, Eq, bon::Builder)]
pub struct BvhSettings {
    /// Ranges of at most this many primitives become leaves.
    #[builder(default = BvhSettings::DEFAULT_MAX_LEAF_SIZE)]
    pub max_leaf_size: NonZeroUsize,

    /// Build subtrees on the rayon thread pool.
    #[builder(default = true)]
    pub parallel_build: bool,

    /// Subtrees with fewer primitives than this are built on the current thread.
    #[builder(default = 1024)]
    pub parallel_threshold: usize,
}

impl BvhSettings {
    pub const DEFAULT_MAX_LEAF_SIZE: NonZeroUsize = NonZeroUsize::new(11).unwrap();

    fn split_in_parallel(&self, primitive_count: usize) -> bool {
        self.parallel_build && primitive_count >= self.parallel_threshold
    }
}

impl Default for BvhSettings {
    fn default() -> Self {
        BvhSettings::builder().build()
    }
}

/// Tree as produced by the recursive build, before it is flattened into the node arena.
enum BuildNode {
    Leaf {
        bounding_box: WorldBox,
        range: Range<usize>,
    },
    Inner {
        bounding_box: WorldBox,
        children: Box<[BuildNode; 2]>,
    },
}

impl<O: Object> Bvh<O> {
    pub fn build(primitives: Vec<O>) -> Bvh<O> {
        Self::build_with(primitives, &BvhSettings::default())
    }

    #[tracing::instrument(skip_all, fields(primitive_count = primitives.len()))]
    pub fn build_with(primitives: Vec<O>, settings: &BvhSettings) -> Bvh<O> {
        let bounds: Vec<PrimitiveBounds> = if settings.split_in_parallel(primitives.len()) {
            primitives.par_iter().map(Object::bounds).collect()
        } else {
            primitives.iter().map(Object::bounds).collect()
        };
        let bounds = IndexVec::from_vec(bounds);

        let mut order: Vec<PrimitiveIdx> = bounds.indices().collect();
        let mut nodes = IndexVec::new();
        let root = if order.is_empty() {
            None
        } else {
            let tree = build_recursive(&mut order, 0, &bounds, settings);
            Some(flatten(&mut nodes, tree))
        };

        let bvh = Bvh {
            primitives,
            bounds,
            order,
            nodes,
            root,
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            let statistics = bvh.statistics();
            tracing::debug!(
                primitives = statistics.primitive_count,
                nodes = statistics.node_count,
                leaves = statistics.leaf_count,
                max_depth = statistics.max_depth,
                child_volume_ratio = statistics.child_volume_ratio.avg,
                "BVH built"
            );
        }

        bvh
    }
}

/// Builds the subtree over `order`, which starts at `offset` in the full index array.
/// Reorders `order` so that every leaf covers a contiguous range.
fn build_recursive(
    order: &mut [PrimitiveIdx],
    offset: usize,
    bounds: &IndexSlice<PrimitiveIdx, [PrimitiveBounds]>,
    settings: &BvhSettings,
) -> BuildNode {
    let bounding_box = order
        .iter()
        .fold(WorldBox::empty(), |acc, i| acc.union(&bounds[*i].bounding_box));

    if order.len() <= settings.max_leaf_size.get() {
        tracing::trace!(offset, size = order.len(), "leaf");
        return BuildNode::Leaf {
            bounding_box,
            range: offset..offset + order.len(),
        };
    }

    // Index as the secondary key keeps the shape independent of the input order
    // when average positions coincide.
    let axis = bounding_box.widest_axis().index();
    order.sort_unstable_by_key(|i| (OrderedFloat(bounds[*i].average_position[axis]), *i));

    let count = order.len();
    let mid = count.div_ceil(2);
    let (left, right) = order.split_at_mut(mid);

    let (left, right) = if settings.split_in_parallel(count) {
        rayon::join(
            || build_recursive(left, offset, bounds, settings),
            || build_recursive(right, offset + mid, bounds, settings),
        )
    } else {
        (
            build_recursive(left, offset, bounds, settings),
            build_recursive(right, offset + mid, bounds, settings),
        )
    };

    BuildNode::Inner {
        bounding_box,
        children: Box::new([left, right]),
    }
}

/// Moves the build tree into the arena, children before their parents.
fn flatten(nodes: &mut IndexVec<NodeIdx, Node>, node: BuildNode) -> NodeIdx {
    match node {
        BuildNode::Leaf {
            bounding_box,
            range,
        } => nodes.push(Node::Leaf {
            bounding_box,
            range,
        }),
        BuildNode::Inner {
            bounding_box,
            children,
        } => {
            let [left, right] = *children;
            let children = [flatten(nodes, left), flatten(nodes, right)];
            nodes.push(Node::Inner {
                bounding_box,
                children,
            })
        }
    }
}
