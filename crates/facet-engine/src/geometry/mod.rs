//! Procedural meshes as indexed triangle lists.
//!
//! Generators fill positions and indices; normals, texture coordinates and
//! colours are optional attribute streams. [`IndexedTriangleList::vertex_data`]
//! packs whichever streams a [`VertexLayout`] asks for.

pub mod cone;
pub mod cube;
pub mod prism;
pub mod sphere;

use glam::{Mat4, Vec2, Vec3};

use crate::bind::{AttrValue, ElementType, VertexData, VertexLayout};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedTriangleList {
    pub positions: Vec<Vec3>,
    /// Empty, or one per position.
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u16>,
}

impl IndexedTriangleList {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u16>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        Self {
            positions,
            indices,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Transforms every position. Normals are left untouched.
    pub fn transform(&mut self, m: Mat4) {
        for p in &mut self.positions {
            *p = m.transform_point3(*p);
        }
    }

    /// Gives every vertex the face normal of the triangle that uses it.
    ///
    /// Only meaningful when no vertex is shared between triangles.
    pub fn set_normals_independent_flat(&mut self) {
        self.normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (p0, p1, p2) = (self.positions[a], self.positions[b], self.positions[c]);
            let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();
            self.normals[a] = n;
            self.normals[b] = n;
            self.normals[c] = n;
        }
    }

    /// Averages the normals of every triangle sharing a vertex.
    pub fn set_normals_smooth(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (p0, p1, p2) = (self.positions[a], self.positions[b], self.positions[c]);
            // area-weighted
            let n = (p1 - p0).cross(p2 - p0);
            sums[a] += n;
            sums[b] += n;
            sums[c] += n;
        }
        self.normals = sums.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Packs the streams named by `layout`, in layout order.
    pub fn vertex_data(&self, layout: &VertexLayout) -> Result<VertexData> {
        for element in layout.elements() {
            let available = match element.ty {
                ElementType::Position3D => self.positions.len(),
                ElementType::Normal => self.normals.len(),
                ElementType::Texture2D => self.tex_coords.len(),
                ElementType::Rgba8Color => self.colors.len(),
                other => {
                    return Err(Error::VertexLayout(format!(
                        "triangle lists carry no {other:?} stream"
                    )));
                }
            };
            if available != self.positions.len() {
                return Err(Error::VertexLayout(format!(
                    "{:?} stream has {available} entries for {} vertices",
                    element.ty,
                    self.positions.len()
                )));
            }
        }

        let mut data = VertexData::new(layout.clone());
        let mut values = Vec::with_capacity(layout.elements().len());
        for i in 0..self.positions.len() {
            values.clear();
            values.extend(layout.elements().iter().map(|e| match e.ty {
                ElementType::Normal => AttrValue::from(self.normals[i]),
                ElementType::Texture2D => AttrValue::from(self.tex_coords[i]),
                ElementType::Rgba8Color => AttrValue::from(self.colors[i]),
                _ => AttrValue::from(self.positions[i]),
            }));
            data.emplace_back(&values)?;
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> IndexedTriangleList {
        IndexedTriangleList::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn flat_normals_follow_winding() {
        let mut tri = triangle();
        tri.set_normals_independent_flat();
        assert_eq!(tri.normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn transform_moves_positions_only() {
        let mut tri = triangle();
        tri.set_normals_independent_flat();
        tri.transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)));
        assert_eq!(tri.positions[1], Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(tri.normals[1], Vec3::Z);
    }

    #[test]
    fn vertex_data_packs_requested_streams() {
        let mut tri = triangle();
        tri.set_normals_independent_flat();
        let layout = VertexLayout::new()
            .append(ElementType::Position3D)
            .append(ElementType::Normal);
        let data = tri.vertex_data(&layout).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.bytes().len(), 3 * 24);
    }

    #[test]
    fn vertex_data_rejects_missing_stream() {
        let tri = triangle();
        let layout = VertexLayout::new()
            .append(ElementType::Position3D)
            .append(ElementType::Texture2D);
        assert!(matches!(tri.vertex_data(&layout), Err(Error::VertexLayout(_))));
    }
}
