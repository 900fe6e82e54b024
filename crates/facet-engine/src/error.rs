//! Error types shared across the engine.
//!
//! Library code returns these typed errors; the runtime and the studio wrap
//! them with `anyhow` context at the top level.

use std::fmt;
use std::path::PathBuf;

use crate::bind::BindableKind;
use crate::drawable::DrawableKind;
use crate::gfx::ShaderId;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level engine error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graphics(#[from] GraphicsError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("failed to load image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("vertex does not match its layout: {0}")]
    VertexLayout(String),
}

/// Category of a failed graphics call, mirroring the device's error classes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorCode {
    OutOfMemory,
    Validation,
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::OutOfMemory => "out of memory",
            ErrorCode::Validation => "validation",
            ErrorCode::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Failures reported by the graphics layer.
#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    /// A device call failed. `info` holds every diagnostic message captured
    /// while the call was in flight.
    #[error("failed to create {what} ({code}){}", format_info(.info))]
    ResourceCreation {
        what: &'static str,
        code: ErrorCode,
        info: Vec<String>,
    },

    #[error("graphics device lost: {reason}")]
    DeviceLost { reason: String },

    #[error("shader `{name}` could not be read from {}", path.display())]
    ShaderNotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input layout was created for vertex shader {expected:?}, but {bound:?} is bound")]
    LayoutMismatch {
        expected: ShaderId,
        bound: Option<ShaderId>,
    },

    #[error("draw issued without a bound {0}")]
    IncompleteState(&'static str),

    #[error("unknown {kind} handle {id}")]
    UnknownHandle { kind: &'static str, id: u32 },

    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),

    #[error("failed to request GPU device: {0}")]
    Device(String),

    #[error("surface error: {0}")]
    Surface(String),
}

fn format_info(info: &[String]) -> String {
    if info.is_empty() {
        String::new()
    } else {
        format!(":\n{}", info.join("\n"))
    }
}

/// Violations of the drawable composition rules.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("index buffers must be registered with add_index_buffer")]
    IndexBufferViaAddBind,

    #[error("attempted to register a second index buffer")]
    DuplicateIndexBuffer,

    #[error("{0:?} has no index buffer to draw with")]
    MissingIndexBuffer(DrawableKind),

    #[error("no index buffer found in the static binds of {0:?}")]
    MissingStaticIndexBuffer(DrawableKind),

    #[error("static binds of {0:?} are owned by the instance that initialized them")]
    StaticAlreadyInitialized(DrawableKind),

    #[error("{drawable:?} has no {kind:?} instance bind")]
    BindableNotFound {
        drawable: DrawableKind,
        kind: BindableKind,
    },

    #[error("{kind:?} constant buffer expects {expected} bytes, got {actual}")]
    ConstantSize {
        kind: BindableKind,
        expected: usize,
        actual: usize,
    },
}

/// Model import failures.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to import {}", path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("{} contains no scene", path.display())]
    NoScene { path: PathBuf },

    #[error("mesh `{mesh}` uses primitive mode {mode:?}; only triangle lists are supported")]
    UnsupportedPrimitive {
        mesh: String,
        mode: gltf::mesh::Mode,
    },

    #[error("mesh `{0}` has no vertex positions")]
    MissingPositions(String),

    #[error("mesh `{mesh}` has {count} vertices, more than 16-bit indices can address")]
    IndexOverflow { mesh: String, count: usize },

    #[error("node `{node}` refers to mesh {index}, which is not in the model")]
    MissingMesh { node: String, index: usize },

    #[error("image {index} uses unsupported pixel format {format:?}")]
    UnsupportedImage {
        index: usize,
        format: gltf::image::Format,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_creation_lists_captured_messages() {
        let err = GraphicsError::ResourceCreation {
            what: "vertex buffer",
            code: ErrorCode::Validation,
            info: vec!["size is zero".into(), "usage is empty".into()],
        };
        let text = err.to_string();
        assert!(text.starts_with("failed to create vertex buffer (validation)"));
        assert!(text.contains("size is zero\nusage is empty"));
    }

    #[test]
    fn resource_creation_without_info_is_one_line() {
        let err = GraphicsError::ResourceCreation {
            what: "sampler",
            code: ErrorCode::OutOfMemory,
            info: Vec::new(),
        };
        assert_eq!(err.to_string(), "failed to create sampler (out of memory)");
    }
}
