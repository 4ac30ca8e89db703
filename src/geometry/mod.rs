/// 几何体加载和场景图模块
///
/// 提供 Wavefront OBJ/MTL 模型导入功能，输出与渲染器无关的场景图。
///
/// # 模块结构
///
/// - `mesh`: 场景网格与图元结构
/// - `material`: 材质与纹理槽位
/// - `scene`: 场景节点树
/// - `loaders`: 文件访问抽象与 OBJ 导入器
///
/// # 架构设计
///
/// ```text
/// 文本 (OBJ + MTL)
///     ↓
/// Scanner (逐行切分语句)
///     ↓
/// OBJ / MTL 解释器 → Model (中间数据)
///     ↓
/// Topology Builder
///     ↓
/// Scene (节点 / 网格 / 材质)
/// ```

pub mod loaders;
pub mod material;
pub mod mesh;
pub mod scene;

// 重新导出常用类型
pub use material::{IlluminationModel, Material, TextureMap, TextureSlot};
pub use mesh::{Mesh, Primitive, PrimitiveKind};
pub use scene::{Node, Scene};
