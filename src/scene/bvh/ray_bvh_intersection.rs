use std::ops::{AddAssign, Range};

use crate::geometry::{Ray, RayIntersectionExt as _};
use crate::scene::{Intersection, Object};

use super::{Bvh, Node, NodeIdx};

/// Work counters of BVH queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose bounding box was tested
    pub nodes_visited: usize,
    pub leaves_scanned: usize,
    /// Ray-primitive intersection tests
    pub primitive_tests: usize,
}

impl AddAssign for TraversalStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes_visited += rhs.nodes_visited;
        self.leaves_scanned += rhs.leaves_scanned;
        self.primitive_tests += rhs.primitive_tests;
    }
}

impl<O: Object> Bvh<O> {
    /// Nearest intersection within the ray's interval.
    /// Hits at equal distance resolve to the lower primitive index.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.intersect_with_stats(ray, &mut TraversalStats::default())
    }

    pub fn intersect_with_stats(
        &self,
        ray: &Ray,
        stats: &mut TraversalStats,
    ) -> Option<Intersection> {
        let root = self.root?;
        if ray.is_degenerate() {
            return None;
        }
        self.nearest_recursive(root, ray, stats)
    }

    /// Whether the ray hits anything within its interval.
    pub fn intersects(&self, ray: &Ray) -> bool {
        self.intersects_with_stats(ray, &mut TraversalStats::default())
    }

    pub fn intersects_with_stats(&self, ray: &Ray, stats: &mut TraversalStats) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        !ray.is_degenerate() && self.any_recursive(root, ray, stats)
    }

    fn nearest_recursive(
        &self,
        node: NodeIdx,
        ray: &Ray,
        stats: &mut TraversalStats,
    ) -> Option<Intersection> {
        stats.nodes_visited += 1;
        let node = &self.nodes[node];
        if !node.bounding_box().hits(ray) {
            return None;
        }

        match node {
            Node::Leaf { range, .. } => self.nearest_in_leaf(range.clone(), ray, stats),
            Node::Inner { children, .. } => {
                let left = self.nearest_recursive(children[0], ray, stats);
                let right = self.nearest_recursive(children[1], ray, stats);
                match (left, right) {
                    (Some(left), Some(right)) => Some(closer(left, right)),
                    (left, right) => left.or(right),
                }
            }
        }
    }

    fn nearest_in_leaf(
        &self,
        range: Range<usize>,
        ray: &Ray,
        stats: &mut TraversalStats,
    ) -> Option<Intersection> {
        stats.leaves_scanned += 1;

        let mut best: Option<Intersection> = None;
        let mut ray = *ray;
        for &index in &self.order[range] {
            stats.primitive_tests += 1;
            let Some(record) = self.primitive(index).intersect(&ray) else {
                continue;
            };
            let candidate = Intersection {
                primitive: index,
                record,
            };
            let winner = match best {
                Some(best) => closer(best, candidate),
                None => candidate,
            };
            // Hits at exactly this distance still count, they may have a lower index
            ray = ray.with_end(winner.record.t);
            best = Some(winner);
        }
        best
    }

    fn any_recursive(&self, node: NodeIdx, ray: &Ray, stats: &mut TraversalStats) -> bool {
        stats.nodes_visited += 1;
        let node = &self.nodes[node];
        if !node.bounding_box().hits(ray) {
            return false;
        }

        match node {
            Node::Leaf { range, .. } => {
                stats.leaves_scanned += 1;
                self.order[range.clone()].iter().any(|&index| {
                    stats.primitive_tests += 1;
                    self.primitive(index).hits(ray)
                })
            }
            Node::Inner { children, .. } => {
                self.any_recursive(children[0], ray, stats)
                    || self.any_recursive(children[1], ray, stats)
            }
        }
    }
}

/// Strictly closer hit wins, equal distances go to the lower primitive index.
fn closer(a: Intersection, b: Intersection) -> Intersection {
    if b.record.t < a.record.t || (b.record.t == a.record.t && b.primitive < a.primitive) {
        b
    } else {
        a
    }
}
