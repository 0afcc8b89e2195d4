pub mod geometry;
pub mod scene;
mod util;

pub use scene::{
    Bvh, BvhSettings, BvhStatistics, Intersection, Object, Primitive, PrimitiveIdx,
    TraversalStats, linear_intersect, linear_intersects,
};
pub use util::Stats;
