/// OBJ 文件加载器
///
/// 把 Wavefront OBJ 文件及其引用的 MTL 材质库导入为 [`Scene`](crate::geometry::Scene)。
/// 不做三角化、不重建法线、不去重顶点：每个面角点对应一个输出顶点。
use super::fs::{FileSystem, StdFileSystem};
use super::{wavefront, Imported, SceneLoader};
use crate::core::config::ImportConfig;
use crate::core::error::{ImportError, ImportErrorKind, Result};
use std::io;
use std::path::Path;

/// 从内存导入时的根节点名称
const MEMORY_ROOT_NAME: &str = "root";

/// OBJ 格式加载器
///
/// 实现 `SceneLoader` trait。文件访问经过 [`FileSystem`]，默认使用真实文件系统。
///
/// # 使用示例
///
/// ```rust,no_run
/// use wavefront_scene::geometry::loaders::{ObjLoader, SceneLoader};
/// use std::path::Path;
///
/// let imported = ObjLoader::new().load_from_file(Path::new("model.obj"))?;
/// for diagnostic in &imported.diagnostics {
///     eprintln!("warning: {}", diagnostic);
/// }
/// println!("加载了 {} 个顶点", imported.scene.vertex_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjLoader<F: FileSystem = StdFileSystem> {
    fs: F,
    config: ImportConfig,
}

impl ObjLoader {
    /// 使用真实文件系统和默认配置
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileSystem> ObjLoader<F> {
    /// 使用指定的文件系统
    pub fn with_file_system(fs: F) -> Self {
        Self {
            fs,
            config: ImportConfig::default(),
        }
    }

    /// 替换导入配置
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// 导入 OBJ 文件
    ///
    /// `mtllib` 相对于 OBJ 文件所在目录解析，根节点以文件名（不含扩展名）命名。
    pub fn import_file(&self, path: &Path) -> std::result::Result<Imported, ImportError> {
        let bytes = self.fs.read(path).map_err(|err| {
            let kind = match err.kind() {
                io::ErrorKind::NotFound => ImportErrorKind::FileNotFound,
                _ => ImportErrorKind::Unreadable(err),
            };
            ImportError::new(kind).in_file(path)
        })?;

        let root_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(MEMORY_ROOT_NAME);
        let base_dir = self.fs.directory_of(path);

        crate::import_debug!("importing {}", path.display());
        wavefront::import(&bytes, Some(path), &base_dir, &self.fs, &self.config, root_name)
    }

    /// 从内存导入 OBJ 数据，`mtllib` 相对于 `base_dir` 解析
    pub fn import_bytes(&self, data: &[u8], base_dir: &Path) -> std::result::Result<Imported, ImportError> {
        wavefront::import(data, None, base_dir, &self.fs, &self.config, MEMORY_ROOT_NAME)
    }

    /// 从字符串导入 OBJ 数据
    pub fn import_str(&self, text: &str, base_dir: &Path) -> std::result::Result<Imported, ImportError> {
        self.import_bytes(text.as_bytes(), base_dir)
    }
}

impl<F: FileSystem> SceneLoader for ObjLoader<F> {
    fn load_from_file(&self, path: &Path) -> Result<Imported> {
        Ok(self.import_file(path)?)
    }

    fn load_from_memory(&self, data: &[u8]) -> Result<Imported> {
        Ok(self.import_bytes(data, Path::new(""))?)
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }
}
