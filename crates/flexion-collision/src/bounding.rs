//! Bounding volumes for collision elements.
//!
//! Collision models hand one [`Aabb`] per element to a
//! [`BoundingTreeBuilder`]; the hierarchy itself belongs to the broad
//! phase. [`AabbTree`] is a median-split builder for callers without one.

use flexion_math::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any expansion overwrites.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Box of a ball of radius `r` around `center`.
    pub fn around(center: Vec3, r: f32) -> Self {
        let r = Vec3::splat(r);
        Self {
            min: center - r,
            max: center + r,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.expand(other);
        out
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z).
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// Consumer of per-element bounding boxes (the broad-phase hierarchy).
pub trait BoundingTreeBuilder {
    /// True until the first build. Static models skip rebuilding once built.
    fn is_empty(&self) -> bool;

    /// Rebuilds the hierarchy over `leaves`, where `leaves[i]` bounds element `i`.
    fn build(&mut self, leaves: &[Aabb], max_depth: usize);
}

// ─── Median-split tree ────────────────────────────────────────

/// One node of an [`AabbTree`].
#[derive(Debug, Clone)]
pub struct AabbNode {
    pub bounds: Aabb,
    /// Child node indices, absent on leaves.
    pub children: Option<(usize, usize)>,
    /// Element indices under this node (leaves only).
    pub elements: Vec<usize>,
}

/// Binary tree of boxes, split at the median along the longest axis.
///
/// Recursion stops at `max_depth` or at a single element.
#[derive(Debug, Clone, Default)]
pub struct AabbTree {
    nodes: Vec<AabbNode>,
    builds: u64,
}

impl AabbTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&AabbNode> {
        self.nodes.first()
    }

    pub fn nodes(&self) -> &[AabbNode] {
        &self.nodes
    }

    /// Number of times [`build`](BoundingTreeBuilder::build) ran.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    /// Depth of the deepest leaf (root = 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[AabbNode], i: usize) -> usize {
            match nodes[i].children {
                Some((l, r)) => 1 + walk(nodes, l).max(walk(nodes, r)),
                None => 0,
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Elements whose leaf boxes may overlap `query`.
    pub fn query(&self, query: &Aabb) -> Vec<usize> {
        let mut hits = Vec::new();
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push(0);
        }
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            if !node.bounds.intersects(query) {
                continue;
            }
            match node.children {
                Some((l, r)) => {
                    stack.push(l);
                    stack.push(r);
                }
                None => hits.extend_from_slice(&node.elements),
            }
        }
        hits.sort_unstable();
        hits
    }

    fn build_recursive(&mut self, leaves: &[Aabb], mut elements: Vec<usize>, depth: usize, max_depth: usize) -> usize {
        let mut bounds = Aabb::empty();
        for &i in &elements {
            bounds.expand(&leaves[i]);
        }

        let slot = self.nodes.len();
        self.nodes.push(AabbNode {
            bounds,
            children: None,
            elements: Vec::new(),
        });

        if elements.len() <= 1 || depth >= max_depth {
            self.nodes[slot].elements = elements;
            return slot;
        }

        let axis = bounds.longest_axis();
        elements.sort_by(|&a, &b| {
            let ca = leaves[a].center()[axis];
            let cb = leaves[b].center()[axis];
            ca.total_cmp(&cb)
        });
        let right = elements.split_off(elements.len() / 2);

        let l = self.build_recursive(leaves, elements, depth + 1, max_depth);
        let r = self.build_recursive(leaves, right, depth + 1, max_depth);
        self.nodes[slot].children = Some((l, r));
        slot
    }
}

impl BoundingTreeBuilder for AabbTree {
    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn build(&mut self, leaves: &[Aabb], max_depth: usize) {
        self.nodes.clear();
        self.builds += 1;
        if leaves.is_empty() {
            return;
        }
        let elements: Vec<usize> = (0..leaves.len()).collect();
        self.build_recursive(leaves, elements, 0, max_depth);
    }
}
