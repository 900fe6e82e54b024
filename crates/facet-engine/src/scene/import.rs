//! glTF 2.0 import into plain CPU-side data.
//!
//! The engine draws in a left-handed space; glTF is right-handed, so Z is
//! mirrored on import for positions, normals and node transforms, and the
//! triangle winding is reversed to match.

use std::path::Path;

use glam::{Mat4, Vec2, Vec3};

use crate::error::ImportError;
use crate::geometry::IndexedTriangleList;
use crate::gfx::ImageData;

/// Shininess used when a material does not specify roughness.
pub const DEFAULT_SHININESS: f32 = 35.0;

/// One triangle-list primitive of a glTF mesh.
#[derive(Debug, Clone)]
pub struct ImportedMesh {
    pub name: String,
    /// Positions, normals, texture coordinates and indices.
    pub geometry: IndexedTriangleList,
    pub material: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ImportedMaterial {
    pub diffuse: Option<ImageData>,
    pub specular: Option<ImageData>,
    pub shininess: f32,
}

impl Default for ImportedMaterial {
    fn default() -> Self {
        Self {
            diffuse: None,
            specular: None,
            shininess: DEFAULT_SHININESS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportedNode {
    pub name: String,
    /// Local transform relative to the parent.
    pub transform: Mat4,
    /// Indices into [`ImportedScene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_meshes(mut self, meshes: Vec<usize>) -> Self {
        self.meshes = meshes;
        self
    }

    pub fn with_child(mut self, child: ImportedNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Meshes, materials and the node tree of one glTF scene.
#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub meshes: Vec<ImportedMesh>,
    pub materials: Vec<ImportedMaterial>,
    pub root: ImportedNode,
}

impl ImportedScene {
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let (document, buffers, images) = gltf::import(path).map_err(|source| ImportError::Gltf {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = convert(&document, &buffers, &images, path)?;
        log::info!(
            "imported {}: {} meshes, {} materials",
            path.display(),
            scene.meshes.len(),
            scene.materials.len()
        );
        Ok(scene)
    }

    /// Imports a `.glb` or self-contained `.gltf` held in memory. `label`
    /// names the source in errors.
    pub fn from_slice(bytes: &[u8], label: &Path) -> Result<Self, ImportError> {
        let (document, buffers, images) =
            gltf::import_slice(bytes).map_err(|source| ImportError::Gltf {
                path: label.to_path_buf(),
                source,
            })?;
        convert(&document, &buffers, &images, label)
    }
}

fn convert(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    path: &Path,
) -> Result<ImportedScene, ImportError> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| ImportError::NoScene {
            path: path.to_path_buf(),
        })?;

    let mut meshes = Vec::new();
    // glTF mesh index -> imported primitives
    let mut primitives_of = Vec::new();
    for mesh in document.meshes() {
        let name = mesh.name().map(str::to_owned).unwrap_or_else(|| format!("mesh{}", mesh.index()));
        let mut imported = Vec::new();
        for primitive in mesh.primitives() {
            imported.push(meshes.len());
            meshes.push(read_primitive(&name, &primitive, buffers)?);
        }
        primitives_of.push(imported);
    }

    let materials = document
        .materials()
        .map(|m| read_material(&m, images))
        .collect::<Result<Vec<_>, _>>()?;

    let mut root = ImportedNode::new(scene.name().unwrap_or("scene"), Mat4::IDENTITY);
    for node in scene.nodes() {
        root.children.push(read_node(&node, &primitives_of));
    }

    Ok(ImportedScene {
        meshes,
        materials,
        root,
    })
}

fn read_node(node: &gltf::Node, primitives_of: &[Vec<usize>]) -> ImportedNode {
    let name = node.name().map(str::to_owned).unwrap_or_else(|| format!("node{}", node.index()));
    let transform = mirror_z(Mat4::from_cols_array_2d(&node.transform().matrix()));
    let meshes = node
        .mesh()
        .and_then(|m| primitives_of.get(m.index()))
        .cloned()
        .unwrap_or_default();
    ImportedNode {
        name,
        transform,
        meshes,
        children: node.children().map(|c| read_node(&c, primitives_of)).collect(),
    }
}

fn read_primitive(
    mesh: &str,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<ImportedMesh, ImportError> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return Err(ImportError::UnsupportedPrimitive {
            mesh: mesh.to_owned(),
            mode: primitive.mode(),
        });
    }
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| ImportError::MissingPositions(mesh.to_owned()))?
        .map(|[x, y, z]| Vec3::new(x, y, -z))
        .collect();
    if positions.len() > u16::MAX as usize + 1 {
        return Err(ImportError::IndexOverflow {
            mesh: mesh.to_owned(),
            count: positions.len(),
        });
    }

    let mut indices: Vec<u16> = match reader.read_indices() {
        Some(read) => read.into_u32().map(|i| i as u16).collect(),
        None => sequential_indices(positions.len()),
    };
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }

    let tex_coords = match reader.read_tex_coords(0) {
        Some(read) => read.into_f32().map(Vec2::from).collect(),
        None => vec![Vec2::ZERO; positions.len()],
    };

    let mut geometry = IndexedTriangleList::new(positions, indices);
    geometry.tex_coords = tex_coords;
    match reader.read_normals() {
        Some(read) => geometry.normals = read.map(|[x, y, z]| Vec3::new(x, y, -z)).collect(),
        None => geometry.set_normals_smooth(),
    }

    Ok(ImportedMesh {
        name: mesh.to_owned(),
        geometry,
        material: primitive.material().index(),
    })
}

/// Indices `0..count` for a primitive without an index accessor. `count` is at
/// most `u16::MAX + 1`, so the last index still fits.
fn sequential_indices(count: usize) -> Vec<u16> {
    (0..count).map(|i| i as u16).collect()
}

fn read_material(
    material: &gltf::Material,
    images: &[gltf::image::Data],
) -> Result<ImportedMaterial, ImportError> {
    let pbr = material.pbr_metallic_roughness();
    let diffuse = pbr
        .base_color_texture()
        .map(|info| to_image(info.texture().source().index(), images))
        .transpose()?;
    let specular = material
        .specular()
        .and_then(|s| s.specular_texture())
        .map(|info| to_image(info.texture().source().index(), images))
        .transpose()?;

    Ok(ImportedMaterial {
        diffuse,
        specular,
        shininess: shininess_from_roughness(pbr.roughness_factor()),
    })
}

/// Blinn-Phong exponent for a glTF roughness. The glTF default of 1.0 maps
/// to [`DEFAULT_SHININESS`].
pub fn shininess_from_roughness(roughness: f32) -> f32 {
    if roughness >= 1.0 {
        return DEFAULT_SHININESS;
    }
    let alpha = roughness.max(0.01).powi(2);
    (2.0 / (alpha * alpha) - 2.0).clamp(1.0, 256.0)
}

fn to_image(index: usize, images: &[gltf::image::Data]) -> Result<ImageData, ImportError> {
    use gltf::image::Format;

    let Some(data) = images.get(index) else {
        return Ok(ImageData::white());
    };
    let rgba = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => data
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        format => return Err(ImportError::UnsupportedImage { index, format }),
    };
    Ok(ImageData {
        width: data.width,
        height: data.height,
        rgba,
    })
}

fn mirror_z(m: Mat4) -> Mat4 {
    let flip = Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0));
    flip * m * flip
}
