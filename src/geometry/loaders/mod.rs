/// 场景加载器模块
///
/// 提供统一的场景加载接口和具体格式的实现。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式，材质来自 `mtllib` 引用的 MTL 文件
///
/// # 使用示例
///
/// ```rust,no_run
/// use wavefront_scene::geometry::loaders::{ObjLoader, SceneLoader};
/// use std::path::Path;
///
/// let imported = ObjLoader::new().load_from_file(Path::new("model.obj"))?;
/// println!("{} 个网格", imported.scene.meshes.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{ImportError, ImportErrorKind, Result};
use crate::geometry::scene::Scene;
use std::path::Path;

pub mod diagnostic;
pub mod fs;
pub mod obj_loader;
mod wavefront;

// 重新导出
pub use diagnostic::Diagnostic;
pub use fs::{FileSystem, MemoryFileSystem, StdFileSystem};
pub use obj_loader::ObjLoader;

/// 一次导入的结果
#[derive(Debug, Clone)]
pub struct Imported {
    /// 导入的场景
    pub scene: Scene,

    /// 可恢复问题的诊断信息，按出现顺序排列
    pub diagnostics: Vec<Diagnostic>,
}

/// 场景加载器 trait
///
/// 所有格式的加载器都实现此 trait。
/// 加载器持有文件系统和配置，每次调用都是独立的一次导入。
pub trait SceneLoader {
    /// 从文件路径加载场景
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误
    fn load_from_file(&self, path: &Path) -> Result<Imported>;

    /// 从内存数据加载场景
    ///
    /// 相对路径的外部引用（如材质库）相对于当前目录解析。
    fn load_from_memory(&self, data: &[u8]) -> Result<Imported>;

    /// 支持的文件扩展名（小写，不含点号）
    fn supported_extensions(&self) -> &'static [&'static str];
}

/// 根据文件扩展名选择加载器，使用默认配置和真实文件系统
///
/// ```rust,no_run
/// use wavefront_scene::geometry::loaders::load_scene;
/// use std::path::Path;
///
/// let imported = load_scene(Path::new("model.obj"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_scene(path: &Path) -> Result<Imported> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let loader = ObjLoader::new();
    if loader.supported_extensions().contains(&extension.as_str()) {
        return loader.load_from_file(path);
    }

    Err(ImportError::new(ImportErrorKind::UnsupportedFormat(extension))
        .in_file(path)
        .into())
}
