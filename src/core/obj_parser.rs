//! Wavefront OBJ parsing into a scene-graph group of triangles.
//!
//! Supports the `v`, `vn`, `f` and `g` statements; faces with more than
//! three vertices are fan-triangulated, and faces carrying normal indices
//! become smooth triangles. Everything else is counted and skipped.

use super::error::{Error, Result};
use super::geometry::{Point3, Vector3};
use super::material::Material;
use super::node::{NodeId, SceneGraph};
use super::transform::Transform;
use crate::shapes::{SmoothTriangle, Triangle};
use nom::{
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map_res, opt, rest},
    multi::many1,
    number::complete::double,
    sequence::{pair, preceded, tuple},
    IResult,
};
use std::path::Path;

/// One `f`-statement vertex: a vertex index plus an optional normal index,
/// both 1-based.
#[derive(Debug, Copy, Clone)]
struct FaceVertex {
    vertex: usize,
    normal: Option<usize>,
}

#[derive(Debug)]
enum Statement {
    Vertex(Point3),
    Normal(Vector3),
    Face(Vec<FaceVertex>),
    Group,
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

fn face_vertex(input: &str) -> IResult<&str, FaceVertex> {
    let (input, vertex) = index(input)?;
    // `1`, `1/2`, `1//3` and `1/2/3` are all valid forms
    let (input, slashes) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), index))),
    ))(input)?;
    let normal = slashes.and_then(|(_texture, normal)| normal);
    Ok((input, FaceVertex { vertex, normal }))
}

fn triple(input: &str) -> IResult<&str, (f64, f64, f64)> {
    tuple((
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    ))(input)
}

fn vertex_line(input: &str) -> IResult<&str, Statement> {
    let (input, _) = char('v')(input)?;
    let (input, (x, y, z)) = all_consuming(triple)(input)?;
    Ok((input, Statement::Vertex(Point3::new(x, y, z))))
}

fn normal_line(input: &str) -> IResult<&str, Statement> {
    let (input, _) = char('v')(input)?;
    let (input, _) = char('n')(input)?;
    let (input, (x, y, z)) = all_consuming(triple)(input)?;
    Ok((input, Statement::Normal(Vector3::new(x, y, z))))
}

fn face_line(input: &str) -> IResult<&str, Statement> {
    let (input, _) = char('f')(input)?;
    let (input, vertices) = all_consuming(many1(preceded(space1, face_vertex)))(input)?;
    Ok((input, Statement::Face(vertices)))
}

fn group_line(input: &str) -> IResult<&str, Statement> {
    let (input, _) = char('g')(input)?;
    let (_rest, _name) = pair(space1, rest)(input)?;
    Ok(("", Statement::Group))
}

fn parse_statement(line: &str) -> Option<Statement> {
    if let Ok((_, s)) = normal_line(line) {
        return Some(s);
    }
    if let Ok((_, s)) = vertex_line(line) {
        return Some(s);
    }
    if let Ok((_, s)) = face_line(line) {
        return Some(s);
    }
    if let Ok((_, s)) = group_line(line) {
        return Some(s);
    }
    None
}

/// Line-oriented OBJ reader. The parser accumulates vertex data and emits
/// triangles into a scene graph.
pub struct ObjParser {
    vertices: Vec<Point3>,
    normals: Vec<Vector3>,
    ignored_lines: usize,
    material: Material,
}

impl ObjParser {
    pub fn new(material: Material) -> ObjParser {
        ObjParser {
            vertices: Vec::new(),
            normals: Vec::new(),
            ignored_lines: 0,
            material,
        }
    }

    /// Lines the parser could not interpret, including blanks.
    pub fn ignored_lines(&self) -> usize {
        self.ignored_lines
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    /// Parse OBJ source into a new group inside `graph`, returning its id.
    /// The group is unparented; attach it with `add_object` or `add_child`.
    pub fn parse_into(&mut self, graph: &mut SceneGraph, input: &str) -> NodeId {
        let default_group = graph.add_group(Transform::identity());
        let mut current_group: Option<NodeId> = None;

        for line in input.lines() {
            match parse_statement(line.trim()) {
                Some(Statement::Vertex(p)) => self.vertices.push(p),
                Some(Statement::Normal(n)) => self.normals.push(n),
                Some(Statement::Face(face)) => {
                    let target = current_group.unwrap_or(default_group);
                    self.emit_face(graph, target, &face);
                }
                Some(Statement::Group) => {
                    let group = graph.add_group(Transform::identity());
                    graph.reparent(group, default_group);
                    current_group = Some(group);
                }
                None => self.ignored_lines += 1,
            }
        }

        default_group
    }

    /// Fan-triangulate one face and attach the triangles.
    fn emit_face(&mut self, graph: &mut SceneGraph, target: NodeId, face: &[FaceVertex]) {
        if face.len() < 3 {
            warn!("face with fewer than 3 vertices skipped");
            self.ignored_lines += 1;
            return;
        }

        let corners: Option<Vec<Point3>> = face
            .iter()
            .map(|fv| self.vertices.get(fv.vertex.wrapping_sub(1)).copied())
            .collect();
        let corners = match corners {
            Some(corners) => corners,
            None => {
                warn!("face references a vertex that does not exist, skipped");
                self.ignored_lines += 1;
                return;
            }
        };

        let corner_normals: Option<Vec<Vector3>> = face
            .iter()
            .map(|fv| {
                fv.normal
                    .and_then(|n| self.normals.get(n.wrapping_sub(1)).copied())
            })
            .collect();

        for i in 1..corners.len() - 1 {
            let id = match &corner_normals {
                Some(normals) => graph.add_primitive(
                    SmoothTriangle::new(
                        corners[0],
                        corners[i],
                        corners[i + 1],
                        normals[0],
                        normals[i],
                        normals[i + 1],
                    ),
                    self.material,
                    Transform::identity(),
                ),
                None => graph.add_primitive(
                    Triangle::new(corners[0], corners[i], corners[i + 1]),
                    self.material,
                    Transform::identity(),
                ),
            };
            graph.reparent(id, target);
        }
    }
}

/// Read and parse an OBJ file from disk.
pub fn parse_obj_file<P: AsRef<Path>>(
    graph: &mut SceneGraph,
    path: P,
    material: Material,
) -> Result<NodeId> {
    let source = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut parser = ObjParser::new(material);
    let group = parser.parse_into(graph, &source);
    info!(
        "parsed OBJ: {} vertices, {} normals, {} ignored lines",
        parser.vertices().len(),
        parser.normals().len(),
        parser.ignored_lines()
    );
    Ok(group)
}
