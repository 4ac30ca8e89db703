//! wavefront_scene - Wavefront OBJ/MTL 场景导入库
//!
//! 读取 OBJ 几何文件及其引用的 MTL 材质库，输出与渲染器无关的场景图：
//! 节点树、按（对象, 材质）划分的网格，以及材质表。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理）
//! - `geometry`: 场景数据结构与 OBJ/MTL 导入器
//!
//! # 使用示例
//!
//! ```no_run
//! use wavefront_scene::geometry::loaders::{ObjLoader, SceneLoader};
//! use std::path::Path;
//!
//! let imported = ObjLoader::new().load_from_file(Path::new("tests/fixtures/cube.obj"))?;
//! let scene = &imported.scene;
//!
//! for node in &scene.root.children {
//!     for mesh in scene.meshes_of(node) {
//!         println!("{}: {} 个顶点", mesh.name, mesh.vertex_count());
//!     }
//! }
//! # Ok::<(), wavefront_scene::SceneError>(())
//! ```

pub mod core;
pub mod geometry;

pub use crate::core::config::{Config, ImportConfig};
pub use crate::core::error::{ImportError, ImportErrorKind, Result, SceneError};
pub use crate::geometry::loaders::{load_scene, Diagnostic, Imported, ObjLoader, SceneLoader};
pub use crate::geometry::scene::{Node, Scene};
