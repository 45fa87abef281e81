use super::error::Error;
use super::geometry::{Bounds3, Point3, Ray, Vector3};
use super::intersection::{sort_intersections, Intersection};
use super::material::Material;
use super::shape::{LocalHit, Primitive};
use super::transform::Transform;
use std::fmt;
use std::sync::OnceLock;

/// Boolean operator applied by a CSG node to its two children.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    Difference,
}

/// Weak handle to a node in a [`SceneGraph`]. Intersections carry these for
/// identity and lookup; ownership always stays with the graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of node variants. Only primitive leaves have a surface;
/// the composite variants structurally have no material or normal.
pub enum NodeKind {
    Primitive {
        shape: Box<dyn Primitive>,
        material: Material,
    },
    Group {
        children: Vec<NodeId>,
    },
    Csg {
        op: CsgOp,
        left: NodeId,
        right: NodeId,
    },
}

pub struct SceneNode {
    pub(crate) kind: NodeKind,
    pub(crate) transform: Transform,
    /// Non-owning back-reference, used only for coordinate-space chains.
    pub(crate) parent: Option<NodeId>,
    /// Local-space bounds, memoized. Must be warmed through `finalize`
    /// before the concurrent render phase begins.
    pub(crate) bounds: OnceLock<Bounds3>,
}

/// Arena that owns every node of a scene. Children are referenced by id, so
/// the ownership direction is strictly parent → child and cycles cannot be
/// expressed by construction (attachment re-checks anyway).
///
/// The graph is built single-threaded, then read concurrently without locks
/// while rendering; all mutating methods invalidate the memoized bounds.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> SceneGraph {
        SceneGraph { nodes: Vec::new() }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.index()]
    }

    fn push(&mut self, kind: NodeKind, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            kind,
            transform,
            parent: None,
            bounds: OnceLock::new(),
        });
        id
    }

    /// Insert a leaf node wrapping a geometric shape.
    pub fn add_primitive<P: Primitive + 'static>(
        &mut self,
        shape: P,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        self.clear_bounds();
        self.push(
            NodeKind::Primitive {
                shape: Box::new(shape),
                material,
            },
            transform,
        )
    }

    /// Insert an empty group.
    pub fn add_group(&mut self, transform: Transform) -> NodeId {
        self.clear_bounds();
        self.push(NodeKind::Group { children: Vec::new() }, transform)
    }

    /// Insert a CSG node over two existing, unparented subtrees.
    pub fn add_csg(
        &mut self,
        op: CsgOp,
        left: NodeId,
        right: NodeId,
        transform: Transform,
    ) -> Result<NodeId, Error> {
        for &child in [left, right].iter() {
            if self.node(child).parent.is_some() {
                return Err(Error::NodeAlreadyParented(child));
            }
        }
        if left == right {
            return Err(Error::NodeAlreadyParented(right));
        }
        self.clear_bounds();
        let id = self.push(NodeKind::Csg { op, left, right }, transform);
        self.node_mut(left).parent = Some(id);
        self.node_mut(right).parent = Some(id);
        Ok(id)
    }

    /// Attach `child` under `group`, setting the child's parent link.
    pub fn add_child(&mut self, group: NodeId, child: NodeId) -> Result<(), Error> {
        if self.node(child).parent.is_some() {
            return Err(Error::NodeAlreadyParented(child));
        }
        // walk up from the group; meeting the child means the child is an
        // ancestor and attaching it would close a loop
        let mut cursor = Some(group);
        while let Some(id) = cursor {
            if id == child {
                return Err(Error::StructuralCycle { parent: group, child });
            }
            cursor = self.node(id).parent;
        }
        match &mut self.node_mut(group).kind {
            NodeKind::Group { children } => children.push(child),
            _ => return Err(Error::NotAGroup(group)),
        }
        self.node_mut(child).parent = Some(group);
        self.clear_bounds();
        Ok(())
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        self.node_mut(id).transform = transform;
        self.clear_bounds();
    }

    pub fn set_material(&mut self, id: NodeId, material: Material) -> Result<(), Error> {
        match &mut self.node_mut(id).kind {
            NodeKind::Primitive { material: slot, .. } => {
                *slot = material;
                Ok(())
            }
            _ => Err(Error::NotAPrimitive(id)),
        }
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.node(id).transform
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The material of a primitive leaf; composites have none.
    pub fn material(&self, id: NodeId) -> Option<&Material> {
        match &self.node(id).kind {
            NodeKind::Primitive { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Direct children of a group; empty for other variants.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Group { children } => children,
            _ => &[],
        }
    }

    /// Whether `target` lies in the subtree rooted at `root`.
    pub fn includes(&self, root: NodeId, target: NodeId) -> bool {
        if root == target {
            return true;
        }
        match &self.node(root).kind {
            NodeKind::Primitive { .. } => false,
            NodeKind::Group { children } => {
                children.iter().any(|&c| self.includes(c, target))
            }
            NodeKind::Csg { left, right, .. } => {
                self.includes(*left, target) || self.includes(*right, target)
            }
        }
    }

    /// Convert a world-space point into the node's object space by chaining
    /// through the ancestors before applying the node's own inverse.
    pub fn world_to_object(&self, id: NodeId, point: Point3) -> Point3 {
        let node = self.node(id);
        let point = match node.parent {
            Some(parent) => self.world_to_object(parent, point),
            None => point,
        };
        node.transform.inverse().transform_point(&point)
    }

    /// Convert an object-space normal into world space, renormalizing at
    /// every level on the way up.
    pub fn normal_to_world(&self, id: NodeId, normal: Vector3) -> Vector3 {
        let node = self.node(id);
        let normal = node.transform.transform_normal(&normal).normalize();
        match node.parent {
            Some(parent) => self.normal_to_world(parent, normal),
            None => normal,
        }
    }

    /// The world-space surface normal for a recorded hit. `None` when the
    /// hit does not reference a primitive leaf, which cannot occur for
    /// intersections minted by this graph.
    pub fn normal_at(&self, hit: &Intersection, world_point: Point3) -> Option<Vector3> {
        match &self.node(hit.object).kind {
            NodeKind::Primitive { shape, .. } => {
                let local_point = self.world_to_object(hit.object, world_point);
                let local_normal = shape.local_normal_at(
                    local_point,
                    &LocalHit { t: hit.t, uv: hit.uv },
                );
                Some(self.normal_to_world(hit.object, local_normal))
            }
            _ => None,
        }
    }

    /// Intersect the subtree rooted at `id` with a ray given in the space of
    /// the node's parent. The node's own inverse transform is applied here;
    /// ancestors have already been unwound by the caller.
    pub fn intersect(&self, id: NodeId, ray: &Ray) -> Vec<Intersection> {
        let node = self.node(id);
        let local_ray = node.transform.inverse().transform_ray(ray);
        match &node.kind {
            NodeKind::Primitive { shape, .. } => shape
                .local_intersect(&local_ray)
                .into_iter()
                .map(|h| Intersection {
                    t: h.t,
                    object: id,
                    uv: h.uv,
                })
                .collect(),
            NodeKind::Group { children } => {
                // the whole point of the cached box: reject without descending
                if !self.bounds(id).intersects(&local_ray) {
                    return Vec::new();
                }
                let mut xs = Vec::new();
                for &child in children {
                    xs.extend(self.intersect(child, &local_ray));
                }
                sort_intersections(&mut xs);
                xs
            }
            NodeKind::Csg { left, right, .. } => {
                if !self.bounds(id).intersects(&local_ray) {
                    return Vec::new();
                }
                let mut xs = self.intersect(*left, &local_ray);
                xs.extend(self.intersect(*right, &local_ray));
                sort_intersections(&mut xs);
                self.filter_intersections(id, xs)
            }
        }
    }

    /// The node's local-space bounding box, memoized on first use.
    pub fn bounds(&self, id: NodeId) -> Bounds3 {
        *self.node(id).bounds.get_or_init(|| self.compute_bounds(id))
    }

    fn compute_bounds(&self, id: NodeId) -> Bounds3 {
        match &self.node(id).kind {
            NodeKind::Primitive { shape, .. } => shape.bounds(),
            NodeKind::Group { children } => {
                let mut bb = Bounds3::empty();
                for &child in children {
                    bb.union(&self.transformed_bounds(child));
                }
                bb
            }
            NodeKind::Csg { left, right, .. } => {
                let mut bb = self.transformed_bounds(*left);
                bb.union(&self.transformed_bounds(*right));
                bb
            }
        }
    }

    /// A child's bounds lifted into its parent's space.
    pub(crate) fn transformed_bounds(&self, id: NodeId) -> Bounds3 {
        let bb = self.bounds(id);
        self.node(id).transform.transform_bounds(&bb)
    }

    /// Populate every memoized bound. Rendering calls this before fanning
    /// out so no cache is initialized concurrently (the cells are race-free
    /// either way, but the contract is that the graph is frozen first).
    pub fn finalize(&self) {
        for i in 0..self.nodes.len() {
            self.bounds(NodeId(i as u32));
        }
    }

    pub(crate) fn clear_bounds(&mut self) {
        for node in &mut self.nodes {
            node.bounds = OnceLock::new();
        }
    }

    /// Swap out a group's direct children wholesale. Restricted to the
    /// subdivision pass, which re-attaches every removed child elsewhere.
    pub(crate) fn replace_children(&mut self, group: NodeId, new_children: Vec<NodeId>) {
        if let NodeKind::Group { children } = &mut self.node_mut(group).kind {
            *children = new_children;
        }
    }

    /// Attach a node under a group without the public checks. For internal
    /// builders that attach only freshly created or just-detached nodes.
    pub(crate) fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        if let NodeKind::Group { children } = &mut self.node_mut(new_parent).kind {
            children.push(child);
        }
        self.node_mut(child).parent = Some(new_parent);
    }
}

impl Default for SceneGraph {
    fn default() -> SceneGraph {
        SceneGraph::new()
    }
}
