use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use glam::Mat4;

use crate::bind::{
    Bindable, ConstantBuffer, DrawContext, ElementType, IndexBuffer, InputLayout, PixelShader,
    PrimitiveTopology, Sampler, Texture, TransformCbuf, VertexBuffer, VertexLayout, VertexShader,
};
use crate::drawable::{DrawableBase, DrawableKind};
use crate::error::{ImportError, Result};
use crate::gfx::{Graphics, ImageData, SamplerDesc, Topology};
use crate::objects::{SpecularMaterial, MATERIAL_SLOT};

use super::import::{
    ImportedMaterial, ImportedMesh, ImportedNode, ImportedScene, DEFAULT_SHININESS,
};
use super::inspector::ModelInspector;

/// Drawable without a transform of its own; the node drawing it passes one.
pub struct Mesh {
    base: DrawableBase,
}

impl Mesh {
    /// Builds a mesh from its index buffer and the rest of its bindables.
    /// A transform buffer is appended.
    pub fn new(gfx: &mut Graphics, index_buffer: IndexBuffer, binds: Vec<Rc<dyn Bindable>>) -> Result<Self> {
        let mut base = DrawableBase::new(gfx, DrawableKind::ModelMesh);
        base.initialize_static(gfx, |_, base| {
            base.add_static_bind(Rc::new(PrimitiveTopology::new(Topology::TriangleList)))?;
            Ok(())
        })?;

        base.add_index_buffer(index_buffer)?;
        for bind in binds {
            base.add_bind(bind)?;
        }
        base.add_bind(Rc::new(TransformCbuf::new(gfx)?))?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &DrawableBase {
        &self.base
    }

    pub fn draw(&self, gfx: &mut Graphics, transform: Mat4) -> Result<()> {
        self.base.draw(gfx, &DrawContext::new(transform))
    }
}

/// Named point of the hierarchy. Owns its children and refers to meshes in
/// the model's pool by index.
#[derive(Debug, Clone)]
pub struct Node {
    id: usize,
    name: String,
    meshes: Vec<usize>,
    children: Vec<Node>,
    base_transform: Mat4,
    applied_transform: Mat4,
}

impl Node {
    pub fn new(id: usize, name: impl Into<String>, meshes: Vec<usize>, base_transform: Mat4) -> Self {
        Self {
            id,
            name: name.into(),
            meshes,
            children: Vec::new(),
            base_transform,
            applied_transform: Mat4::IDENTITY,
        }
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[usize] {
        &self.meshes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn base_transform(&self) -> Mat4 {
        self.base_transform
    }

    pub fn applied_transform(&self) -> Mat4 {
        self.applied_transform
    }

    pub fn set_applied_transform(&mut self, transform: Mat4) {
        self.applied_transform = transform;
    }

    /// Transform handed to this node's meshes and children.
    pub fn accumulate(&self, parent: Mat4) -> Mat4 {
        parent * self.base_transform * self.applied_transform
    }

    /// Draws own meshes with the accumulated transform, then every child,
    /// depth first.
    pub fn draw(&self, gfx: &mut Graphics, pool: &[Mesh], parent: Mat4) -> Result<()> {
        let built = self.accumulate(parent);
        for &index in &self.meshes {
            let mesh = pool.get(index).ok_or_else(|| ImportError::MissingMesh {
                node: self.name.clone(),
                index,
            })?;
            mesh.draw(gfx, built)?;
        }
        for child in &self.children {
            child.draw(gfx, pool, built)?;
        }
        Ok(())
    }

    /// Calls `f` with every node and its accumulated transform, pre-order.
    pub fn visit<F: FnMut(&Node, Mat4)>(&self, parent: Mat4, f: &mut F) {
        let built = self.accumulate(parent);
        f(self, built);
        for child in &self.children {
            child.visit(built, f);
        }
    }

    pub fn find_mut(&mut self, id: usize) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }
}

/// One line of the node tree widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub id: usize,
    pub name: String,
    pub depth: usize,
    pub is_leaf: bool,
    pub selected: bool,
}

/// Mesh pool, node hierarchy and the inspector editing it.
pub struct Model {
    meshes: Vec<Mesh>,
    root: Node,
    inspector: ModelInspector,
}

impl Model {
    pub fn load(gfx: &mut Graphics, path: &Path) -> Result<Self> {
        let scene = ImportedScene::load(path)?;
        Self::new(gfx, &scene)
    }

    pub fn new(gfx: &mut Graphics, scene: &ImportedScene) -> Result<Self> {
        let mut textures = TextureCache::default();
        let meshes = scene
            .meshes
            .iter()
            .map(|mesh| {
                let material = mesh.material.and_then(|i| scene.materials.get(i));
                parse_mesh(gfx, mesh, material, &mut textures)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut next_id = 0;
        let root = parse_node(&mut next_id, &scene.root, meshes.len())?;
        log::debug!("model: {} meshes, {next_id} nodes", meshes.len());

        Ok(Self {
            meshes,
            root,
            inspector: ModelInspector::default(),
        })
    }

    /// Applies the inspected node's parameters, then draws the whole tree.
    pub fn draw(&mut self, gfx: &mut Graphics) -> Result<()> {
        if let Some((id, transform)) = self.inspector.applied() {
            if let Some(node) = self.root.find_mut(id) {
                node.set_applied_transform(transform);
            }
        }
        self.root.draw(gfx, &self.meshes, Mat4::IDENTITY)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn inspector(&self) -> &ModelInspector {
        &self.inspector
    }

    pub fn inspector_mut(&mut self) -> &mut ModelInspector {
        &mut self.inspector
    }

    /// Node tree in display order.
    pub fn tree_rows(&self) -> Vec<NodeRow> {
        let mut rows = Vec::new();
        push_rows(&self.root, 0, self.inspector.selected(), &mut rows);
        rows
    }

    /// Accumulated transform of every node, pre-order.
    pub fn world_transforms(&self) -> Vec<(usize, Mat4)> {
        let mut out = Vec::new();
        self.root.visit(Mat4::IDENTITY, &mut |node, built| out.push((node.id(), built)));
        out
    }
}

fn push_rows(node: &Node, depth: usize, selected: Option<usize>, rows: &mut Vec<NodeRow>) {
    rows.push(NodeRow {
        id: node.id(),
        name: node.name().to_owned(),
        depth,
        is_leaf: node.children().is_empty(),
        selected: selected == Some(node.id()),
    });
    for child in node.children() {
        push_rows(child, depth + 1, selected, rows);
    }
}

fn parse_node(next_id: &mut usize, imported: &ImportedNode, pool_len: usize) -> Result<Node> {
    if let Some(&index) = imported.meshes.iter().find(|&&i| i >= pool_len) {
        return Err(ImportError::MissingMesh {
            node: imported.name.clone(),
            index,
        }
        .into());
    }
    let mut node = Node::new(*next_id, imported.name.clone(), imported.meshes.clone(), imported.transform);
    *next_id += 1;
    for child in &imported.children {
        node.add_child(parse_node(next_id, child, pool_len)?);
    }
    Ok(node)
}

/// Textures of each material, created the first time a mesh uses them.
#[derive(Default)]
struct TextureCache {
    by_material: HashMap<usize, MaterialTextures>,
    fallback: Option<Rc<dyn Bindable>>,
}

#[derive(Clone)]
struct MaterialTextures {
    diffuse: Rc<dyn Bindable>,
    specular: Option<Rc<dyn Bindable>>,
}

impl TextureCache {
    fn get(
        &mut self,
        gfx: &mut Graphics,
        index: Option<usize>,
        material: Option<&ImportedMaterial>,
    ) -> Result<MaterialTextures> {
        if let Some(cached) = index.and_then(|i| self.by_material.get(&i)) {
            return Ok(cached.clone());
        }

        let diffuse = match material.and_then(|m| m.diffuse.as_ref()) {
            Some(image) => Rc::new(Texture::new(gfx, image, 0)?) as Rc<dyn Bindable>,
            None => self.fallback(gfx)?,
        };
        let specular = match material.and_then(|m| m.specular.as_ref()) {
            Some(image) => Some(Rc::new(Texture::new(gfx, image, 1)?) as Rc<dyn Bindable>),
            None => None,
        };
        let textures = MaterialTextures { diffuse, specular };
        if let Some(i) = index {
            self.by_material.insert(i, textures.clone());
        }
        Ok(textures)
    }

    fn fallback(&mut self, gfx: &mut Graphics) -> Result<Rc<dyn Bindable>> {
        if let Some(white) = &self.fallback {
            return Ok(Rc::clone(white));
        }
        let white: Rc<dyn Bindable> = Rc::new(Texture::new(gfx, &ImageData::white(), 0)?);
        self.fallback = Some(Rc::clone(&white));
        Ok(white)
    }
}

fn parse_mesh(
    gfx: &mut Graphics,
    mesh: &ImportedMesh,
    material: Option<&ImportedMaterial>,
    textures: &mut TextureCache,
) -> Result<Mesh> {
    let layout = VertexLayout::new()
        .append(ElementType::Position3D)
        .append(ElementType::Normal)
        .append(ElementType::Texture2D);

    let mut binds: Vec<Rc<dyn Bindable>> = Vec::new();

    let maps = textures.get(gfx, mesh.material, material)?;
    let has_specular_map = maps.specular.is_some();
    binds.push(maps.diffuse);
    if let Some(specular) = maps.specular {
        binds.push(specular);
    }
    binds.push(Rc::new(Sampler::new(gfx, SamplerDesc::default(), 0)?));

    binds.push(Rc::new(VertexBuffer::from_data(gfx, &mesh.geometry.vertex_data(&layout)?)?));
    let index_buffer = IndexBuffer::new(gfx, &mesh.geometry.indices)?;

    let vs = VertexShader::new(gfx, "model_phong_vs")?;
    binds.push(Rc::new(InputLayout::new(gfx, &layout, &vs)?));
    binds.push(Rc::new(vs));

    if has_specular_map {
        binds.push(Rc::new(PixelShader::new(gfx, "model_phong_spec_ps")?));
    } else {
        binds.push(Rc::new(PixelShader::new(gfx, "model_phong_ps")?));
        let shininess = material.map_or(DEFAULT_SHININESS, |m| m.shininess);
        let constants = SpecularMaterial::new(0.8, shininess);
        binds.push(Rc::new(ConstantBuffer::pixel(gfx, MATERIAL_SLOT, &constants)?));
    }

    Mesh::new(gfx, index_buffer, binds)
}
