use super::color::Color;
use super::error::Error;
use super::geometry::{Point3, Ray};
use super::intersection::{get_hit, prepare_computations, sort_intersections, Intersection};
use super::light::PointLight;
use super::material::Material;
use super::node::{CsgOp, NodeId, SceneGraph};
use super::rng::Rng;
use super::shape::Primitive;
use super::transform::Transform;

/// Top-level container for a scene: the node arena, the roots a ray fans
/// out to, the lights, and the background color returned for escaped rays.
///
/// A world is assembled single-threaded, then treated as strictly read-only
/// for the duration of a render.
pub struct World {
    graph: SceneGraph,
    roots: Vec<NodeId>,
    pub lights: Vec<PointLight>,
    pub background: Color,
}

impl World {
    pub fn new() -> World {
        World {
            graph: SceneGraph::new(),
            roots: Vec::new(),
            lights: Vec::new(),
            background: Color::BLACK,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Insert a leaf node; it still needs `add_object` or `add_child` to
    /// take part in rendering.
    pub fn add_primitive<P: Primitive + 'static>(
        &mut self,
        shape: P,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        self.graph.add_primitive(shape, material, transform)
    }

    pub fn add_group(&mut self, transform: Transform) -> NodeId {
        self.graph.add_group(transform)
    }

    pub fn add_csg(
        &mut self,
        op: CsgOp,
        left: NodeId,
        right: NodeId,
        transform: Transform,
    ) -> Result<NodeId, Error> {
        for &child in [left, right].iter() {
            if self.roots.contains(&child) {
                return Err(Error::NodeAlreadyParented(child));
            }
        }
        self.graph.add_csg(op, left, right, transform)
    }

    pub fn add_child(&mut self, group: NodeId, child: NodeId) -> Result<(), Error> {
        if self.roots.contains(&child) {
            return Err(Error::NodeAlreadyParented(child));
        }
        self.graph.add_child(group, child)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        self.graph.set_transform(id, transform);
    }

    pub fn set_material(&mut self, id: NodeId, material: Material) -> Result<(), Error> {
        self.graph.set_material(id, material)
    }

    /// Promote a node to a top-level object of the scene.
    pub fn add_object(&mut self, id: NodeId) -> Result<(), Error> {
        if self.graph.parent(id).is_some() || self.roots.contains(&id) {
            return Err(Error::NodeAlreadyParented(id));
        }
        self.roots.push(id);
        Ok(())
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Split every root group into a bounding-volume hierarchy.
    pub fn divide(&mut self, threshold: usize) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.graph.divide(root, threshold);
        }
    }

    /// Freeze all memoized state ahead of the concurrent render phase.
    pub fn finalize(&self) {
        self.graph.finalize();
    }

    /// Every intersection between the ray and the scene, sorted by `t`.
    pub fn intersect(&self, ray: &Ray) -> Vec<Intersection> {
        let mut xs = Vec::new();
        for &root in &self.roots {
            xs.extend(self.graph.intersect(root, ray));
        }
        sort_intersections(&mut xs);
        xs
    }

    /// Resolve the color a ray carries back, recursing through scattered
    /// rays until the depth budget runs out. The budget is the sole
    /// termination guarantee.
    pub fn color_at(&self, ray: &Ray, depth: u32, rng: &mut Rng) -> Color {
        let mut xs = self.intersect(ray);
        let hit = match get_hit(&mut xs) {
            Some(hit) => hit,
            None => return self.background,
        };
        let comps = match prepare_computations(&self.graph, &hit, ray, &xs) {
            Some(comps) => comps,
            None => return self.background,
        };
        let material = match self.graph.material(hit.object) {
            Some(material) => *material,
            None => return self.background,
        };

        let mut color = material.emitted();
        if depth > 0 {
            if let Some((attenuation, scattered)) = material.scatter(ray, &comps, rng) {
                color += attenuation * self.color_at(&scattered, depth - 1, rng);
            }
        }
        color
    }

    /// Whether anything blocks the segment between a surface point and the
    /// light. Call with an epsilon-offset point to avoid shadow acne.
    pub fn is_shadowed(&self, light: &PointLight, point: Point3) -> bool {
        let v = light.position - point;
        let distance = v.length();
        let direction = v.normalize();

        let mut xs = self.intersect(&Ray::new(point, direction));
        match get_hit(&mut xs) {
            Some(hit) => hit.t < distance,
            None => false,
        }
    }
}

impl Default for World {
    fn default() -> World {
        World::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vector3;
    use crate::shapes::Sphere;

    /// Two concentric spheres and one light, used across the world tests.
    fn test_world() -> (World, NodeId, NodeId) {
        let mut w = World::new();
        let outer = w.add_primitive(
            Sphere::new(),
            Material::diffuse(Color::new(0.8, 1.0, 0.6)),
            Transform::identity(),
        );
        let inner = w.add_primitive(
            Sphere::new(),
            Material::default(),
            Transform::scale(0.5, 0.5, 0.5).unwrap(),
        );
        w.add_object(outer).unwrap();
        w.add_object(inner).unwrap();
        w.add_light(PointLight::new(
            Point3::new(-10.0, 10.0, -10.0),
            Color::WHITE,
        ));
        (w, outer, inner)
    }

    #[test]
    fn a_new_world_is_empty() {
        let w = World::new();
        assert!(w.roots().is_empty());
        assert!(w.lights.is_empty());
        assert_eq!(w.background, Color::BLACK);
    }

    #[test]
    fn intersecting_the_world_with_a_ray() {
        let (w, _, _) = test_world();
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let xs = w.intersect(&r);
        assert_eq!(xs.len(), 4);
        assert_eq!(xs[0].t, 4.0);
        assert_eq!(xs[1].t, 4.5);
        assert_eq!(xs[2].t, 5.5);
        assert_eq!(xs[3].t, 6.0);
    }

    #[test]
    fn a_rooted_node_cannot_be_rooted_twice_or_reparented() {
        let mut w = World::new();
        let s = w.add_primitive(Sphere::new(), Material::default(), Transform::identity());
        w.add_object(s).unwrap();
        assert!(matches!(w.add_object(s), Err(Error::NodeAlreadyParented(_))));
        let g = w.add_group(Transform::identity());
        assert!(matches!(w.add_child(g, s), Err(Error::NodeAlreadyParented(_))));
    }

    #[test]
    fn the_color_when_a_ray_misses() {
        let (mut w, _, _) = test_world();
        w.background = Color::new(0.1, 0.2, 0.3);
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 1.0, 0.0));
        let mut rng = Rng::new(0);
        assert_eq!(w.color_at(&r, 4, &mut rng), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn the_color_of_an_emissive_hit_is_its_emission() {
        let mut w = World::new();
        let s = w.add_primitive(
            Sphere::new(),
            Material::emissive(Color::new(2.0, 3.0, 4.0)),
            Transform::identity(),
        );
        w.add_object(s).unwrap();
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut rng = Rng::new(0);
        assert_eq!(w.color_at(&r, 4, &mut rng), Color::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn an_exhausted_depth_budget_stops_scattering() {
        let (w, _, _) = test_world();
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut rng = Rng::new(0);
        // a diffuse surface without a light emits nothing by itself
        assert_eq!(w.color_at(&r, 0, &mut rng), Color::BLACK);
    }

    #[test]
    fn an_enclosed_emissive_sphere_lights_its_surroundings() {
        let mut w = World::new();
        let shell = w.add_primitive(
            Sphere::new(),
            Material::diffuse(Color::new(0.5, 0.5, 0.5)),
            Transform::scale(10.0, 10.0, 10.0).unwrap(),
        );
        let lamp = w.add_primitive(
            Sphere::new(),
            Material::emissive(Color::WHITE),
            Transform::identity(),
        );
        w.add_object(shell).unwrap();
        w.add_object(lamp).unwrap();
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut rng = Rng::new(0);
        let c = w.color_at(&r, 8, &mut rng);
        assert_eq!(c, Color::WHITE);
    }

    #[test]
    fn there_is_no_shadow_when_nothing_blocks_the_light() {
        let (w, _, _) = test_world();
        let light = w.lights[0];
        assert!(!w.is_shadowed(&light, Point3::new(0.0, 10.0, 0.0)));
    }

    #[test]
    fn there_is_a_shadow_when_an_object_is_between_point_and_light() {
        let (w, _, _) = test_world();
        let light = w.lights[0];
        assert!(w.is_shadowed(&light, Point3::new(10.0, -10.0, 10.0)));
    }

    #[test]
    fn there_is_no_shadow_when_the_object_is_behind_the_light() {
        let (w, _, _) = test_world();
        let light = w.lights[0];
        assert!(!w.is_shadowed(&light, Point3::new(-20.0, 20.0, -20.0)));
    }

    #[test]
    fn there_is_no_shadow_when_the_object_is_behind_the_point() {
        let (w, _, _) = test_world();
        let light = w.lights[0];
        assert!(!w.is_shadowed(&light, Point3::new(-2.0, 2.0, -2.0)));
    }
}
