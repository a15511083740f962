//! Which nodes a request may enter and what entering them costs.

use std::fmt;
use std::sync::Arc;

use wayfarer_core::{NodeId, NodeInfo};

/// Custom traversal rules. When set on a [`Traversal`] it replaces the
/// tag-based rules entirely.
pub trait TraversalProvider {
    fn can_traverse(&self, node: NodeId, info: &NodeInfo) -> bool;

    /// Extra cost for entering `node`, added to the edge cost.
    fn traversal_cost(&self, node: NodeId, info: &NodeInfo) -> u32;
}

/// Per-request traversal rules.
///
/// By default a node can be entered if it is walkable and its tag is
/// enabled, and entering it costs its tag penalty plus its own penalty.
#[derive(Clone)]
pub struct Traversal {
    /// Bit `t` set means tag `t` may be entered.
    pub enabled_tags: u32,
    pub tag_penalties: [u32; 32],
    provider: Option<Arc<dyn TraversalProvider>>,
}

impl Default for Traversal {
    fn default() -> Self {
        Self {
            enabled_tags: u32::MAX,
            tag_penalties: [0; 32],
            provider: None,
        }
    }
}

impl fmt::Debug for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("enabled_tags", &format_args!("{:#034b}", self.enabled_tags))
            .field("tag_penalties", &self.tag_penalties)
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only allow the tags set in `mask`.
    pub fn with_tags(mut self, mask: u32) -> Self {
        self.enabled_tags = mask;
        self
    }

    /// Forbid entering nodes tagged `tag`.
    pub fn without_tag(mut self, tag: u32) -> Self {
        if tag < 32 {
            self.enabled_tags &= !(1 << tag);
        }
        self
    }

    /// Charge `penalty` for entering nodes tagged `tag`.
    pub fn with_tag_penalty(mut self, tag: u32, penalty: u32) -> Self {
        if let Some(p) = self.tag_penalties.get_mut(tag as usize) {
            *p = penalty;
        }
        self
    }

    /// Replace the tag rules with `provider`.
    pub fn with_provider(mut self, provider: Arc<dyn TraversalProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Whether `tag` is enabled.
    #[inline]
    pub fn tag_enabled(&self, tag: u32) -> bool {
        tag < 32 && self.enabled_tags & (1 << tag) != 0
    }

    pub fn can_traverse(&self, node: NodeId, info: &NodeInfo) -> bool {
        match &self.provider {
            Some(p) => p.can_traverse(node, info),
            None => info.walkable && self.tag_enabled(info.tag),
        }
    }

    pub fn cost(&self, node: NodeId, info: &NodeInfo) -> u32 {
        match &self.provider {
            Some(p) => p.traversal_cost(node, info),
            None => {
                let tag = self.tag_penalties.get(info.tag as usize).copied().unwrap_or(0);
                tag.saturating_add(info.penalty)
            }
        }
    }
}

/// Filter for nearest-node lookups when resolving endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConstraint {
    pub walkable_only: bool,
    /// Bit `t` set means nodes tagged `t` are accepted.
    pub tags: u32,
    /// Only accept nodes in this area.
    pub area: Option<u32>,
}

impl Default for NodeConstraint {
    fn default() -> Self {
        Self {
            walkable_only: true,
            tags: u32::MAX,
            area: None,
        }
    }
}

impl NodeConstraint {
    pub fn accepts(&self, info: &NodeInfo) -> bool {
        if self.walkable_only && !info.walkable {
            return false;
        }
        if info.tag >= 32 || self.tags & (1 << info.tag) == 0 {
            return false;
        }
        self.area.is_none_or(|a| a == info.area)
    }
}
