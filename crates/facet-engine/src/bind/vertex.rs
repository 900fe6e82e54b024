//! Runtime-described vertex formats.
//!
//! A [`VertexLayout`] lists typed elements in order; [`VertexData`] is a
//! packed byte buffer following that layout. The layout also yields the
//! attribute list an input layout is created from.

use glam::{Vec2, Vec3, Vec4};

use crate::error::{Error, Result};
use crate::gfx::{VertexElement, VertexFormat};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    Position2D,
    Position3D,
    Texture2D,
    Normal,
    Float3Color,
    Float4Color,
    Rgba8Color,
}

impl ElementType {
    pub fn format(self) -> VertexFormat {
        match self {
            ElementType::Position2D | ElementType::Texture2D => VertexFormat::Float32x2,
            ElementType::Position3D | ElementType::Normal | ElementType::Float3Color => {
                VertexFormat::Float32x3
            }
            ElementType::Float4Color => VertexFormat::Float32x4,
            ElementType::Rgba8Color => VertexFormat::Unorm8x4,
        }
    }

    pub fn size(self) -> u32 {
        self.format().size()
    }

    pub fn semantic(self) -> &'static str {
        match self {
            ElementType::Position2D | ElementType::Position3D => "Position",
            ElementType::Texture2D => "Texcoord",
            ElementType::Normal => "Normal",
            ElementType::Float3Color | ElementType::Float4Color | ElementType::Rgba8Color => {
                "Color"
            }
        }
    }

    fn accepts(self, value: &AttrValue) -> bool {
        matches!(
            (self.format(), value),
            (VertexFormat::Float32x2, AttrValue::Float2(_))
                | (VertexFormat::Float32x3, AttrValue::Float3(_))
                | (VertexFormat::Float32x4, AttrValue::Float4(_))
                | (VertexFormat::Unorm8x4, AttrValue::Rgba8(_))
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Element {
    pub ty: ElementType,
    pub offset: u32,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VertexLayout {
    elements: Vec<Element>,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element after the current ones.
    pub fn append(mut self, ty: ElementType) -> Self {
        let offset = self.size();
        self.elements.push(Element { ty, offset });
        self
    }

    pub fn resolve(&self, ty: ElementType) -> Option<&Element> {
        self.elements.iter().find(|e| e.ty == ty)
    }

    pub fn has(&self, ty: ElementType) -> bool {
        self.resolve(ty).is_some()
    }

    /// Size of one vertex in bytes.
    pub fn size(&self) -> u32 {
        self.elements
            .last()
            .map(|e| e.offset + e.ty.size())
            .unwrap_or(0)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Attribute list for an input layout; locations follow element order.
    pub fn input_elements(&self) -> Vec<VertexElement> {
        self.elements
            .iter()
            .enumerate()
            .map(|(location, e)| VertexElement {
                semantic: e.ty.semantic(),
                format: e.ty.format(),
                offset: e.offset,
                location: location as u32,
            })
            .collect()
    }
}

/// One attribute value for [`VertexData::emplace_back`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AttrValue {
    Float2([f32; 2]),
    Float3([f32; 3]),
    Float4([f32; 4]),
    Rgba8([u8; 4]),
}

impl From<Vec2> for AttrValue {
    fn from(v: Vec2) -> Self {
        AttrValue::Float2(v.to_array())
    }
}

impl From<Vec3> for AttrValue {
    fn from(v: Vec3) -> Self {
        AttrValue::Float3(v.to_array())
    }
}

impl From<Vec4> for AttrValue {
    fn from(v: Vec4) -> Self {
        AttrValue::Float4(v.to_array())
    }
}

impl From<[u8; 4]> for AttrValue {
    fn from(v: [u8; 4]) -> Self {
        AttrValue::Rgba8(v)
    }
}

/// Packed vertices following a [`VertexLayout`].
#[derive(Debug, Clone)]
pub struct VertexData {
    layout: VertexLayout,
    bytes: Vec<u8>,
}

impl VertexData {
    pub fn new(layout: VertexLayout) -> Self {
        Self {
            layout,
            bytes: Vec::new(),
        }
    }

    /// Appends one vertex; values must match the layout's elements in order.
    pub fn emplace_back(&mut self, values: &[AttrValue]) -> Result<()> {
        let elements = self.layout.elements();
        if values.len() != elements.len() {
            return Err(Error::VertexLayout(format!(
                "expected {} attributes, got {}",
                elements.len(),
                values.len()
            )));
        }
        if let Some((e, v)) = elements.iter().zip(values).find(|(e, v)| !e.ty.accepts(v)) {
            return Err(Error::VertexLayout(format!(
                "{:?} element cannot hold {v:?}",
                e.ty
            )));
        }

        for value in values {
            match value {
                AttrValue::Float2(v) => self.bytes.extend_from_slice(bytemuck::bytes_of(v)),
                AttrValue::Float3(v) => self.bytes.extend_from_slice(bytemuck::bytes_of(v)),
                AttrValue::Float4(v) => self.bytes.extend_from_slice(bytemuck::bytes_of(v)),
                AttrValue::Rgba8(v) => self.bytes.extend_from_slice(v),
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of vertices stored.
    pub fn len(&self) -> usize {
        match self.layout.size() {
            0 => 0,
            stride => self.bytes.len() / stride as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured() -> VertexLayout {
        VertexLayout::new()
            .append(ElementType::Position3D)
            .append(ElementType::Normal)
            .append(ElementType::Texture2D)
    }

    #[test]
    fn offsets_accumulate() {
        let layout = textured();
        assert_eq!(layout.size(), 32);
        assert_eq!(layout.resolve(ElementType::Normal).map(|e| e.offset), Some(12));
        assert_eq!(layout.resolve(ElementType::Texture2D).map(|e| e.offset), Some(24));
        assert!(!layout.has(ElementType::Float3Color));
    }

    #[test]
    fn input_elements_use_element_order_for_locations() {
        let elements = textured().input_elements();
        let locations: Vec<u32> = elements.iter().map(|e| e.location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
        assert_eq!(elements[2].format, VertexFormat::Float32x2);
    }

    #[test]
    fn emplace_back_packs_values() {
        let mut data = VertexData::new(
            VertexLayout::new()
                .append(ElementType::Position3D)
                .append(ElementType::Rgba8Color),
        );
        data.emplace_back(&[Vec3::new(1.0, 2.0, 3.0).into(), [255, 0, 0, 255].into()])
            .unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.bytes().len(), 16);
        assert_eq!(&data.bytes()[12..], &[255, 0, 0, 255]);
    }

    #[test]
    fn emplace_back_rejects_mismatched_values() {
        let mut data = VertexData::new(textured());
        let err = data
            .emplace_back(&[Vec3::ZERO.into(), Vec2::ZERO.into(), Vec2::ZERO.into()])
            .unwrap_err();
        assert!(matches!(err, Error::VertexLayout(_)));

        let err = data.emplace_back(&[Vec3::ZERO.into()]).unwrap_err();
        assert!(matches!(err, Error::VertexLayout(_)));
        assert!(data.is_empty());
    }
}
