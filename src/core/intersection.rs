use super::common::{consts::SURFACE_OFFSET, Float};
use super::geometry::{Point3, Ray, Vector3};
use super::node::{NodeId, SceneGraph};
use std::cmp::Ordering;

/// A surface crossing at parameter `t` along some ray. The node is referred
/// to by id only; the scene graph keeps ownership.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub t: Float,
    pub object: NodeId,
    /// Barycentric coordinates for triangle hits.
    pub uv: Option<(Float, Float)>,
}

impl Intersection {
    pub fn new(t: Float, object: NodeId) -> Intersection {
        Intersection { t, object, uv: None }
    }
}

/// Stable ascending sort by `t`. NaNs compare equal so a pathological value
/// cannot abort the comparison.
pub fn sort_intersections(xs: &mut [Intersection]) {
    xs.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal));
}

/// The visible hit: the intersection with the smallest non-negative `t`, or
/// `None` when the ray escapes.
pub fn get_hit(xs: &mut [Intersection]) -> Option<Intersection> {
    sort_intersections(xs);
    xs.iter().find(|i| i.t >= 0.0).copied()
}

/// Everything light transport needs to know about one hit, derived once.
#[derive(Debug, Copy, Clone)]
pub struct Computations {
    pub t: Float,
    pub object: NodeId,
    pub point: Point3,
    pub eyev: Vector3,
    pub normalv: Vector3,
    pub reflectv: Vector3,
    /// True when the ray origin is inside the surface; the normal has been
    /// flipped to face the eye in that case.
    pub inside: bool,
    /// Hit point nudged along the normal, for rays leaving the outside.
    pub over_point: Point3,
    /// Hit point nudged against the normal, for rays continuing inside.
    pub under_point: Point3,
    /// Refractive indices on the incoming and outgoing side of the hit.
    pub n1: Float,
    pub n2: Float,
}

/// Derive the shading context for `hit`. The full sorted intersection list
/// is required: the refractive indices on either side of the hit depend on
/// every transparent volume the ray has entered and not yet left.
///
/// Returns `None` only if the hit does not refer to a primitive leaf, which
/// intersections produced by the graph always do.
pub fn prepare_computations(
    graph: &SceneGraph,
    hit: &Intersection,
    ray: &Ray,
    xs: &[Intersection],
) -> Option<Computations> {
    let point = ray.position(hit.t);
    let eyev = -ray.direction;
    let mut normalv = graph.normal_at(hit, point)?;

    let inside = normalv.dot(&eyev) < 0.0;
    if inside {
        normalv = -normalv;
    }
    let reflectv = ray.direction.reflect(&normalv);

    let refractive_index_of = |id: NodeId| -> Float {
        graph.material(id).map_or(1.0, |m| m.refractive_index())
    };

    // walk the sorted list, tracking which volumes the ray is currently
    // inside; vacuum (1.0) when the stack is empty
    let mut n1 = 1.0;
    let mut n2 = 1.0;
    let mut containers: Vec<NodeId> = Vec::new();
    for item in xs {
        let at_hit = item == hit;
        if at_hit {
            n1 = containers.last().map_or(1.0, |&id| refractive_index_of(id));
        }

        if let Some(pos) = containers.iter().position(|&id| id == item.object) {
            containers.remove(pos);
        } else {
            containers.push(item.object);
        }

        if at_hit {
            n2 = containers.last().map_or(1.0, |&id| refractive_index_of(id));
            break;
        }
    }

    Some(Computations {
        t: hit.t,
        object: hit.object,
        point,
        eyev,
        normalv,
        reflectv,
        inside,
        over_point: point + normalv * SURFACE_OFFSET,
        under_point: point - normalv * SURFACE_OFFSET,
        n1,
        n2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::{approx_eq, consts::SURFACE_OFFSET};
    use crate::core::material::Material;
    use crate::core::transform::Transform;
    use crate::shapes::{Plane, Sphere};

    fn graph_with_sphere(transform: Transform) -> (SceneGraph, NodeId) {
        let mut g = SceneGraph::new();
        let s = g.add_primitive(Sphere::new(), Material::default(), transform);
        (g, s)
    }

    #[test]
    fn the_hit_when_all_intersections_are_positive() {
        let (_, s) = graph_with_sphere(Transform::identity());
        let mut xs = vec![Intersection::new(1.0, s), Intersection::new(2.0, s)];
        assert_eq!(get_hit(&mut xs).unwrap().t, 1.0);
    }

    #[test]
    fn the_hit_when_some_intersections_are_negative() {
        let (_, s) = graph_with_sphere(Transform::identity());
        let mut xs = vec![Intersection::new(-1.0, s), Intersection::new(1.0, s)];
        assert_eq!(get_hit(&mut xs).unwrap().t, 1.0);
    }

    #[test]
    fn the_hit_when_all_intersections_are_negative() {
        let (_, s) = graph_with_sphere(Transform::identity());
        let mut xs = vec![Intersection::new(-2.0, s), Intersection::new(-1.0, s)];
        assert!(get_hit(&mut xs).is_none());
    }

    #[test]
    fn the_hit_is_the_lowest_nonnegative_intersection() {
        let (_, s) = graph_with_sphere(Transform::identity());
        let mut xs = vec![
            Intersection::new(5.0, s),
            Intersection::new(7.0, s),
            Intersection::new(-3.0, s),
            Intersection::new(2.0, s),
        ];
        assert_eq!(get_hit(&mut xs).unwrap().t, 2.0);
    }

    #[test]
    fn sorting_is_stable_for_ties() {
        let mut g = SceneGraph::new();
        let a = g.add_primitive(Sphere::new(), Material::default(), Transform::identity());
        let b = g.add_primitive(Sphere::new(), Material::default(), Transform::identity());
        let mut xs = vec![Intersection::new(1.0, a), Intersection::new(1.0, b)];
        sort_intersections(&mut xs);
        assert_eq!(xs[0].object, a);
        assert_eq!(xs[1].object, b);
    }

    #[test]
    fn precomputing_the_state_of_an_intersection() {
        let (g, s) = graph_with_sphere(Transform::identity());
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = Intersection::new(4.0, s);
        let comps = prepare_computations(&g, &hit, &r, &[hit]).unwrap();
        assert_eq!(comps.t, 4.0);
        assert_eq!(comps.point, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(comps.eyev, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(comps.normalv, Vector3::new(0.0, 0.0, -1.0));
        assert!(!comps.inside);
    }

    #[test]
    fn the_normal_is_flipped_when_the_hit_is_inside() {
        let (g, s) = graph_with_sphere(Transform::identity());
        let r = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let hit = Intersection::new(1.0, s);
        let comps = prepare_computations(&g, &hit, &r, &[hit]).unwrap();
        assert_eq!(comps.point, Point3::new(0.0, 0.0, 1.0));
        assert!(comps.inside);
        assert_eq!(comps.normalv, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn the_hit_offsets_the_over_point() {
        let (g, s) = graph_with_sphere(Transform::translate(0.0, 0.0, 1.0));
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = Intersection::new(5.0, s);
        let comps = prepare_computations(&g, &hit, &r, &[hit]).unwrap();
        assert!(comps.over_point.z < -SURFACE_OFFSET / 2.0);
        assert!(comps.point.z > comps.over_point.z);
    }

    #[test]
    fn the_hit_offsets_the_under_point() {
        let (g, s) = graph_with_sphere(Transform::translate(0.0, 0.0, 1.0));
        let r = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = Intersection::new(5.0, s);
        let comps = prepare_computations(&g, &hit, &r, &[hit]).unwrap();
        assert!(comps.under_point.z > SURFACE_OFFSET / 2.0);
        assert!(comps.point.z < comps.under_point.z);
    }

    #[test]
    fn precomputing_the_reflection_vector() {
        let mut g = SceneGraph::new();
        let p = g.add_primitive(Plane::new(), Material::default(), Transform::identity());
        let k = 2f64.sqrt() / 2.0;
        let r = Ray::new(Point3::new(0.0, 1.0, -1.0), Vector3::new(0.0, -k, k));
        let hit = Intersection::new(2f64.sqrt(), p);
        let comps = prepare_computations(&g, &hit, &r, &[hit]).unwrap();
        assert!(approx_eq(comps.reflectv.x, 0.0));
        assert!(approx_eq(comps.reflectv.y, k));
        assert!(approx_eq(comps.reflectv.z, k));
    }

    #[test]
    fn finding_n1_and_n2_at_various_intersections() {
        let mut g = SceneGraph::new();
        let a = g.add_primitive(
            Sphere::new(),
            Material::dielectric(1.5),
            Transform::scale(2.0, 2.0, 2.0).unwrap(),
        );
        let b = g.add_primitive(
            Sphere::new(),
            Material::dielectric(2.0),
            Transform::translate(0.0, 0.0, -0.25),
        );
        let c = g.add_primitive(
            Sphere::new(),
            Material::dielectric(2.5),
            Transform::translate(0.0, 0.0, 0.25),
        );
        let r = Ray::new(Point3::new(0.0, 0.0, -4.0), Vector3::new(0.0, 0.0, 1.0));
        let xs = vec![
            Intersection::new(2.0, a),
            Intersection::new(2.75, b),
            Intersection::new(3.25, c),
            Intersection::new(4.75, b),
            Intersection::new(5.25, c),
            Intersection::new(6.0, a),
        ];
        let expected = [
            (1.0, 1.5),
            (1.5, 2.0),
            (2.0, 2.5),
            (2.5, 2.5),
            (2.5, 1.5),
            (1.5, 1.0),
        ];
        for (index, (n1, n2)) in expected.iter().enumerate() {
            let comps = prepare_computations(&g, &xs[index], &r, &xs).unwrap();
            assert_eq!(comps.n1, *n1, "n1 at index {}", index);
            assert_eq!(comps.n2, *n2, "n2 at index {}", index);
        }
    }
}
