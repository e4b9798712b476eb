//! Wavefront Core - Geometry vocabulary shared by the loaders
//!
//! This crate provides the foundational types used by the format crates:
//! - Mathematical primitives (re-exported from glam)
//! - RGB color type
//! - The geometry source/target interface used to hand meshes to a renderer

pub mod geom;
pub mod types;

pub use geom::{Attrib, AttribSet, GeometrySource, GeometryTarget, MeshBuffers, Primitive};
pub use glam::{Vec2, Vec3};
pub use types::Color;
