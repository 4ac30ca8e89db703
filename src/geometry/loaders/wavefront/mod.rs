/// Wavefront OBJ/MTL 导入管线
///
/// 扫描器 → OBJ 解释器（遇到 `mtllib` 时同步进入 MTL 解释器）→ 拓扑构建 → [`Scene`]。
/// 一次导入的所有可变状态都在 [`Model`] 和 [`ImportContext`] 中，导入之间不共享任何状态。

mod model;
mod mtl;
mod obj;
mod scanner;
mod topology;

use std::borrow::Cow;
use std::path::Path;

use self::model::Model;
use self::obj::ObjInterpreter;
use super::diagnostic::Diagnostics;
use super::fs::FileSystem;
use super::Imported;
use crate::core::config::ImportConfig;
use crate::core::error::{ImportError, ImportErrorKind};
use crate::geometry::scene::Scene;

/// 单次导入的上下文：文件访问、配置和诊断收集
pub(crate) struct ImportContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub config: &'a ImportConfig,
    pub diagnostics: Diagnostics,
}

impl<'a> ImportContext<'a> {
    pub(crate) fn new(fs: &'a dyn FileSystem, config: &'a ImportConfig) -> Self {
        Self {
            fs,
            config,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// 导入一份 OBJ 数据
///
/// - `source`：OBJ 文件路径，用于错误定位（从内存导入时为空）
/// - `base_dir`：解析 `mtllib` 相对路径的目录
/// - `root_name`：场景根节点名称
pub(crate) fn import(
    bytes: &[u8],
    source: Option<&Path>,
    base_dir: &Path,
    fs: &dyn FileSystem,
    config: &ImportConfig,
    root_name: &str,
) -> Result<Imported, ImportError> {
    let locate = |err: ImportError| match source {
        Some(source) => err.in_file(source),
        None => err,
    };

    if bytes.len() < config.min_file_size {
        return Err(locate(ImportError::new(ImportErrorKind::FileTooSmall {
            size: bytes.len(),
            minimum: config.min_file_size,
        })));
    }

    let _span = crate::span_trace!("wavefront_import").entered();

    let text: Cow<'_, str> = String::from_utf8_lossy(bytes);
    let mut context = ImportContext::new(fs, config);
    let mut model = Model::new();

    ObjInterpreter::new(source, base_dir).run(&text, &mut model, &mut context)?;
    let scene: Scene = topology::build_scene(&model, config, root_name).map_err(locate)?;

    crate::import_info!(
        source = %source.unwrap_or(Path::new("<memory>")).display(),
        vertices = model.vertices.len(),
        faces = model.faces.len(),
        groups = model.groups.len(),
        meshes = scene.meshes.len(),
        materials = scene.materials.len(),
        "imported wavefront scene"
    );

    Ok(Imported {
        scene,
        diagnostics: context.diagnostics.into_vec(),
    })
}
