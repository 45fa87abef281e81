//! Intersection filtering for constructive solid geometry nodes.
//!
//! A CSG node collects the intersections of both children along a ray and
//! keeps only the crossings where the combined solid's surface actually
//! changes, according to the boolean operator.

use super::intersection::Intersection;
use super::node::{CsgOp, NodeId, NodeKind, SceneGraph};

/// Whether an intersection belongs to the result surface.
///
/// `lhit` is true when the hit lies on the left subtree; `inl` and `inr`
/// track whether the ray is currently inside the left/right child.
pub fn intersection_allowed(op: CsgOp, lhit: bool, inl: bool, inr: bool) -> bool {
    match op {
        CsgOp::Union => (lhit && !inr) || (!lhit && !inl),
        CsgOp::Intersection => (lhit && inr) || (!lhit && inl),
        CsgOp::Difference => (lhit && !inr) || (!lhit && inl),
    }
}

impl SceneGraph {
    /// Filter a sorted intersection list down to the crossings the CSG node
    /// exposes, walking the list with two in/out parity flags.
    pub(crate) fn filter_intersections(
        &self,
        csg: NodeId,
        xs: Vec<Intersection>,
    ) -> Vec<Intersection> {
        let (op, left) = match &self.node(csg).kind {
            NodeKind::Csg { op, left, .. } => (*op, *left),
            _ => return xs,
        };

        let mut result = Vec::with_capacity(xs.len());
        let mut inl = false;
        let mut inr = false;

        for intersection in xs {
            let lhit = self.includes(left, intersection.object);

            if intersection_allowed(op, lhit, inl, inr) {
                result.push(intersection);
            }

            if lhit {
                inl = !inl;
            } else {
                inr = !inr;
            }
        }

        result
    }
}
