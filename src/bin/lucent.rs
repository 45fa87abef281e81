//! Scene-construction and CLI glue around the core renderer.

use lucent::core::camera::Camera;
use lucent::core::color::Color;
use lucent::core::error::Error;
use lucent::core::geometry::{Point3, Vector3};
use lucent::core::material::Material;
use lucent::core::obj_parser::parse_obj_file;
use lucent::core::renderer::{render, RenderConfig};
use lucent::core::rng::Rng;
use lucent::core::transform::Transform;
use lucent::core::world::World;
use lucent::shapes::{Cube, Sphere};
use std::time::Instant;

struct Args {
    width: usize,
    samples: u32,
    depth: u32,
    output: String,
    obj: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        width: 640,
        samples: 64,
        depth: 8,
        output: String::from("render.png"),
        obj: None,
    };
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let mut positional = 0;
    for arg in argv {
        if arg == "-h" || arg == "--help" {
            return Err(String::from(
                "usage: lucent [WIDTH] [SAMPLES] [DEPTH] [OUTPUT.png] [MODEL.obj]",
            ));
        }
        match positional {
            0 => args.width = arg.parse().map_err(|_| format!("bad width {:?}", arg))?,
            1 => args.samples = arg.parse().map_err(|_| format!("bad sample count {:?}", arg))?,
            2 => args.depth = arg.parse().map_err(|_| format!("bad depth {:?}", arg))?,
            3 => args.output = arg,
            4 => args.obj = Some(arg),
            _ => return Err(format!("unexpected argument {:?}", arg)),
        }
        positional += 1;
    }
    Ok(args)
}

/// A cube floor with jittered heights under an emissive panel, plus one
/// sphere of each scattering material.
fn build_scene(world: &mut World, obj: Option<&str>) -> Result<(), Error> {
    let scene = world.add_group(Transform::identity());

    let floor = world.add_group(Transform::identity());
    let floor_material = Material::diffuse(Color::new(0.7, 0.8, 0.7));
    let mut heights = Rng::new(1337);
    let count = 20i32;
    for i in 0..count {
        for j in 0..count {
            let block = world.add_primitive(
                Cube::new(),
                floor_material,
                Transform::translate(
                    (i * 2 - count) as f64,
                    -1.0 * heights.uniform_float() - 2.0,
                    (j * 2 - count) as f64,
                ),
            );
            world.add_child(floor, block)?;
        }
    }
    world.add_child(scene, floor)?;

    let panel = world.add_primitive(
        Cube::new(),
        Material::emissive(Color::WHITE),
        Transform::translate(0.0, 10.0, 0.0) * Transform::scale(10.0, 0.01, 10.0)?,
    );
    world.add_child(scene, panel)?;

    let matte = world.add_primitive(
        Sphere::new(),
        Material::diffuse(Color::new(0.8, 0.5, 0.5)),
        Transform::identity(),
    );
    world.add_child(scene, matte)?;

    let brushed = world.add_primitive(
        Sphere::new(),
        Material::metal(Color::new(0.5, 0.8, 0.8), 0.2),
        Transform::translate(-2.5, 0.0, 0.0),
    );
    world.add_child(scene, brushed)?;

    let glass = world.add_primitive(
        Sphere::new(),
        Material::dielectric(1.5),
        Transform::translate(2.5, 0.0, 0.0),
    );
    world.add_child(scene, glass)?;

    if let Some(path) = obj {
        let mesh = parse_obj_file(
            world.graph_mut(),
            path,
            Material::metal(Color::new(0.66, 0.66, 0.7), 0.4),
        )?;
        world.set_transform(mesh, Transform::translate(0.0, 1.5, 2.0));
        world.add_child(scene, mesh)?;
    }

    world.add_object(scene)?;
    world.divide(1);

    world.background = Color::new(0.1, 0.1, 0.1);
    Ok(())
}

fn run() -> Result<(), Error> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let mut world = World::new();
    build_scene(&mut world, args.obj.as_deref())?;

    let height = args.width * 9 / 16;
    let mut camera = Camera::new(args.width, height, std::f64::consts::PI / 3.0)?;
    camera.set_transform(Transform::view_transform(
        Point3::new(0.0, 4.0, -10.0),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    )?);

    let config = RenderConfig {
        sample_count: args.samples,
        max_depth: args.depth,
        ..RenderConfig::default()
    };

    let start = Instant::now();
    let canvas = render(&world, &camera, &config)?;
    println!("Render time: {:.2}s", start.elapsed().as_secs_f64());

    canvas.save_png(&args.output)?;
    println!("Saved: {}", args.output);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}
