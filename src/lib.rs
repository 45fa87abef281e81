//! A recursive CPU ray tracer: a transform-aware scene graph with group
//! and CSG composition, spatial-median bounding volume hierarchies,
//! stochastic materials, and a row-parallel renderer with deterministic
//! per-row sampling.

#[macro_use]
extern crate log;

pub mod core;
pub mod shapes;
pub mod accelerators;
