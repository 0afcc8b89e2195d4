use std::fmt::{self, Display};

use crate::scene::Object;
use crate::util::Stats;

use super::{Bvh, Node, NodeIdx};

/// Shape summary of a built tree.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub primitive_count: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    /// Number of inner nodes on the longest root to leaf path, zero for a single leaf.
    pub max_depth: usize,
    pub leaf_depth: Stats,
    pub leaf_size: Stats,
    /// Sum of child volumes over the parent volume, for inner nodes with non-zero volume.
    pub child_volume_ratio: Stats,
}

impl<O: Object> Bvh<O> {
    pub fn statistics(&self) -> BvhStatistics {
        let mut ret = BvhStatistics {
            primitive_count: self.primitives.len(),
            node_count: self.nodes.len(),
            leaf_count: 0,
            max_depth: 0,
            leaf_depth: Stats::default(),
            leaf_size: Stats::default(),
            child_volume_ratio: Stats::default(),
        };
        if let Some(root) = self.root {
            self.statistics_recursive(root, 0, &mut ret);
        }
        ret
    }

    fn statistics_recursive(&self, node: NodeIdx, depth: usize, statistics: &mut BvhStatistics) {
        match &self.nodes[node] {
            Node::Leaf { range, .. } => {
                statistics.leaf_count += 1;
                statistics.max_depth = statistics.max_depth.max(depth);
                statistics.leaf_depth.add_sample(depth as f64);
                statistics.leaf_size.add_sample(range.len() as f64);
            }
            Node::Inner {
                bounding_box,
                children,
            } => {
                let volume = bounding_box.volume();
                if volume > 0.0 {
                    let children_volume: f64 = children
                        .iter()
                        .map(|child| self.nodes[*child].bounding_box().volume())
                        .sum();
                    statistics.child_volume_ratio.add_sample(children_volume / volume);
                }
                for child in children {
                    self.statistics_recursive(*child, depth + 1, statistics);
                }
            }
        }
    }

    /// Dumps the node hierarchy to stdout, one line per node.
    pub fn print_tree(&self) {
        match self.root {
            Some(root) => self.print_recursive(0, root),
            None => println!("<EMPTY>"),
        }
    }

    fn print_recursive(&self, indent: usize, node: NodeIdx) {
        let n = &self.nodes[node];
        let b = n.bounding_box();
        match n {
            Node::Leaf { range, .. } => {
                println!(
                    "{}- L{}: {:?}-{:?}: {:?}",
                    "  ".repeat(indent),
                    node.index(),
                    b.min,
                    b.max,
                    self.order[range.clone()]
                        .iter()
                        .map(|i| i.index())
                        .collect::<Vec<_>>()
                );
            }
            Node::Inner { children, .. } => {
                println!(
                    "{}- I{}: {:?}-{:?}",
                    "  ".repeat(indent),
                    node.index(),
                    b.min,
                    b.max
                );
                for child in children {
                    self.print_recursive(indent + 1, *child);
                }
            }
        }
    }
}

impl Display for BvhStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Primitives: {}", self.primitive_count)?;
        writeln!(f, "Nodes: {}, leaves: {}", self.node_count, self.leaf_count)?;
        writeln!(f, "Max depth: {}", self.max_depth)?;
        writeln!(f, "Leaf depth: {}", self.leaf_depth)?;
        writeln!(f, "Leaf size: {}", self.leaf_size)?;
        write!(f, "Child volume ratio: {}", self.child_volume_ratio)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::WorldPoint;
    use crate::scene::{AxisBox, Sphere};
    use assert2::assert;

    #[test]
    fn single_leaf() {
        let stats = Bvh::build(vec![Sphere::new(WorldPoint::origin(), 1.0)]).statistics();
        assert!(stats.primitive_count == 1);
        assert!(stats.node_count == 1);
        assert!(stats.leaf_count == 1);
        assert!(stats.max_depth == 0);
        assert!(stats.child_volume_ratio.count == 0);
    }

    #[test]
    fn empty() {
        let stats = Bvh::<Sphere>::build(Vec::new()).statistics();
        assert!(stats.node_count == 0);
        assert!(stats.leaf_count == 0);
        assert!(stats.leaf_size.count == 0);
    }

    #[test]
    fn row_of_boxes() {
        // Unit boxes with unit gaps: the root spans 47 units, children 23 each
        let boxes: Vec<_> = (0..24)
            .map(|i| {
                let min = WorldPoint::new(2.0 * i as f64, 0.0, 0.0);
                AxisBox::new(min, min + crate::geometry::WorldVector::repeat(1.0))
            })
            .collect();
        let stats = Bvh::build(boxes).statistics();

        assert!(stats.primitive_count == 24);
        assert!(stats.leaf_count == 4);
        assert!(stats.node_count == 7);
        assert!(stats.max_depth == 2);
        assert!(stats.leaf_size.min == 6.0);
        assert!(stats.leaf_size.max == 6.0);
        assert!(stats.leaf_depth.avg == 2.0);
        assert!(stats.child_volume_ratio.count == 3);
        assert!((stats.child_volume_ratio.max - 46.0 / 47.0).abs() < 1e-12);
    }

    #[test]
    fn display_mentions_counts() {
        let stats = Bvh::build(vec![Sphere::new(WorldPoint::origin(), 1.0)]).statistics();
        let output = stats.to_string();
        assert!(output.contains("Primitives: 1"));
        assert!(output.contains("Nodes: 1, leaves: 1"));
    }
}
