use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::GraphicsError;

use super::backend::{ShaderSource, ShaderStage};

/// Resolves shader names to WGSL source.
///
/// Files are read once as `<dir>/<name>.wgsl` and cached. Without a directory
/// every name resolves to an empty module, which only the headless backend
/// accepts.
#[derive(Debug, Default)]
pub struct ShaderLibrary {
    dir: Option<PathBuf>,
    cache: HashMap<String, Rc<str>>,
}

impl ShaderLibrary {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            cache: HashMap::new(),
        }
    }

    pub fn load(&mut self, name: &str, stage: ShaderStage) -> Result<ShaderSource, GraphicsError> {
        if let Some(code) = self.cache.get(name) {
            return Ok(ShaderSource {
                name: name.to_string(),
                stage,
                code: Rc::clone(code),
            });
        }

        let code: Rc<str> = match &self.dir {
            Some(dir) => {
                let path = dir.join(format!("{name}.wgsl"));
                let text = std::fs::read_to_string(&path).map_err(|source| {
                    GraphicsError::ShaderNotFound {
                        name: name.to_string(),
                        path: path.clone(),
                        source,
                    }
                })?;
                log::debug!("loaded shader `{name}` from {}", path.display());
                text.into()
            }
            None => Rc::from(""),
        };

        self.cache.insert(name.to_string(), Rc::clone(&code));
        Ok(ShaderSource {
            name: name.to_string(),
            stage,
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let mut lib = ShaderLibrary::new(Some(PathBuf::from("/nonexistent/facet-shaders")));
        let err = lib.load("phong_vs", ShaderStage::Vertex).unwrap_err();
        match err {
            GraphicsError::ShaderNotFound { name, path, .. } => {
                assert_eq!(name, "phong_vs");
                assert!(path.ends_with("phong_vs.wgsl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_and_caches_source() {
        let dir = std::env::temp_dir().join(format!("facet-shaders-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("solid_ps.wgsl"), "// solid").unwrap();

        let mut lib = ShaderLibrary::new(Some(dir.clone()));
        let first = lib.load("solid_ps", ShaderStage::Pixel).unwrap();
        std::fs::remove_file(dir.join("solid_ps.wgsl")).unwrap();
        let second = lib.load("solid_ps", ShaderStage::Pixel).unwrap();

        assert_eq!(&*first.code, "// solid");
        assert!(Rc::ptr_eq(&first.code, &second.code));
        let _ = std::fs::remove_dir(&dir);
    }
}
