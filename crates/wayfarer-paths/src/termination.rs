//! Pluggable end conditions for [`PathRequest::custom`](crate::PathRequest::custom).

use wayfarer_core::{NodeId, NodeInfo, Point};

use crate::SearchRecord;

/// Decides whether a dequeued node ends the search.
pub trait EndingCondition {
    fn target_found(&self, node: NodeId, record: &SearchRecord, info: &NodeInfo) -> bool;
}

impl<F> EndingCondition for F
where
    F: Fn(NodeId, &SearchRecord, &NodeInfo) -> bool,
{
    fn target_found(&self, node: NodeId, record: &SearchRecord, info: &NodeInfo) -> bool {
        self(node, record, info)
    }
}

/// Stop at one specific node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetNode(pub NodeId);

impl EndingCondition for TargetNode {
    fn target_found(&self, node: NodeId, _: &SearchRecord, _: &NodeInfo) -> bool {
        node == self.0
    }
}

/// Stop at the first node within `distance` world units of `point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithinDistance {
    pub point: Point,
    pub distance: u32,
}

impl EndingCondition for WithinDistance {
    fn target_found(&self, _: NodeId, _: &SearchRecord, info: &NodeInfo) -> bool {
        let d = self.distance as i64;
        (info.position - self.point).sq_magnitude() <= d * d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> NodeInfo {
        NodeInfo {
            position: Point::new(x, y),
            area: 1,
            walkable: true,
            tag: 0,
            penalty: 0,
        }
    }

    #[test]
    fn builtins() {
        let r = SearchRecord::default();
        assert!(TargetNode(NodeId(3)).target_found(NodeId(3), &r, &at(0, 0)));
        assert!(!TargetNode(NodeId(3)).target_found(NodeId(4), &r, &at(0, 0)));
        let w = WithinDistance {
            point: Point::ZERO,
            distance: 5,
        };
        assert!(w.target_found(NodeId(0), &r, &at(3, 4)));
        assert!(!w.target_found(NodeId(0), &r, &at(4, 4)));
    }

    #[test]
    fn closures() {
        let cheap = |_: NodeId, r: &SearchRecord, _: &NodeInfo| r.g >= 10;
        let r = SearchRecord {
            g: 12,
            ..SearchRecord::default()
        };
        assert!(cheap.target_found(NodeId(0), &r, &at(0, 0)));
    }
}
