//! Scene graph.
//!
//! Responsibilities:
//! - import glTF files into CPU-side meshes, materials and a node tree
//! - turn them into a [`Model`]: a flat mesh pool plus owned [`Node`]s
//! - accumulate node transforms top-down while drawing
//! - keep per-node edit parameters for the inspector

mod import;
mod inspector;
mod model;

pub use import::{
    shininess_from_roughness, ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene,
    DEFAULT_SHININESS,
};
pub use inspector::{ModelInspector, TransformParameters};
pub use model::{Mesh, Model, Node, NodeRow};
