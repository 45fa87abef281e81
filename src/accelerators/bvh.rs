//! Spatial-median subdivision of groups into a bounding volume hierarchy.
//!
//! `divide` restructures a group's children into nested sub-groups so that
//! a ray missing a sub-group's box skips every child inside it. The set of
//! intersections returned for any ray is unchanged by construction: a child
//! only moves into a half-space sub-group when its transformed bound is
//! fully contained there, and straddlers stay at the current level so no
//! effective bound ever shrinks.

use crate::core::node::{NodeId, NodeKind, SceneGraph};
use crate::core::transform::Transform;

impl SceneGraph {
    /// Recursively partition the subtree rooted at `id`. Groups split when
    /// they have at least `threshold` direct children; CSG nodes recurse
    /// into both sides without ever moving a node across the left/right
    /// boundary; leaves are untouched.
    pub fn divide(&mut self, id: NodeId, threshold: usize) {
        self.clear_bounds();
        self.divide_inner(id, threshold);
    }

    fn divide_inner(&mut self, id: NodeId, threshold: usize) {
        match &self.node(id).kind {
            NodeKind::Primitive { .. } => {}
            NodeKind::Csg { left, right, .. } => {
                let (left, right) = (*left, *right);
                self.divide_inner(left, threshold);
                self.divide_inner(right, threshold);
            }
            NodeKind::Group { children } => {
                if children.len() >= threshold {
                    let (fit_left, fit_right) = self.partition_children(id);
                    if !fit_left.is_empty() {
                        self.make_subgroup(id, fit_left);
                    }
                    if !fit_right.is_empty() {
                        self.make_subgroup(id, fit_right);
                    }
                }
                let children = self.children(id).to_vec();
                for child in children {
                    self.divide_inner(child, threshold);
                }
            }
        }
    }

    /// Pull out the children whose transformed bounds fit entirely inside
    /// one half of the group's box. Children overlapping the split plane
    /// remain direct children.
    fn partition_children(&mut self, group: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let (left_box, right_box) = self.bounds(group).split();

        let children = self.children(group).to_vec();
        let mut fit_left = Vec::new();
        let mut fit_right = Vec::new();
        let mut keep = Vec::with_capacity(children.len());

        for child in children {
            let bb = self.transformed_bounds(child);
            if left_box.contains_bounds(&bb) {
                fit_left.push(child);
            } else if right_box.contains_bounds(&bb) {
                fit_right.push(child);
            } else {
                keep.push(child);
            }
        }

        if !keep.is_empty() {
            debug!(
                "divide: {} of {} children straddle the split plane of {} and stay put",
                keep.len(),
                keep.len() + fit_left.len() + fit_right.len(),
                group
            );
        }

        self.replace_children(group, keep);
        (fit_left, fit_right)
    }

    /// Wrap the given children into a fresh identity-transform sub-group
    /// attached under `group`.
    fn make_subgroup(&mut self, group: NodeId, members: Vec<NodeId>) {
        let subgroup = self.add_group(Transform::identity());
        for member in members {
            self.reparent(member, subgroup);
        }
        self.reparent(subgroup, group);
    }
}
