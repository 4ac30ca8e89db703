/// 材质数据结构模块
///
/// 定义从 MTL 材质库解析得到的材质记录。
/// 场景中的材质只存储一次，网格通过索引引用材质。

use crate::core::math::Color;

/// 默认材质名称
///
/// 当 `usemtl` 引用不存在的材质或未指定材质时使用。
pub const DEFAULT_MATERIAL_NAME: &str = "default";

/// 默认漫反射颜色（线性 RGB）
pub const DEFAULT_DIFFUSE: f32 = 0.6;

/// 光照模型
///
/// 对应 MTL 的 `illum` 语句。只支持 0、1、2 三种取值，
/// 其他取值按 Gouraud 处理并产生诊断信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IlluminationModel {
    /// `illum 0`：无光照，仅使用颜色
    None,
    /// `illum 1`：漫反射光照
    #[default]
    Gouraud,
    /// `illum 2`：带高光的光照
    Phong,
}

impl IlluminationModel {
    /// 从 `illum` 数值转换，超出范围返回 `None`
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(IlluminationModel::None),
            1 => Some(IlluminationModel::Gouraud),
            2 => Some(IlluminationModel::Phong),
            _ => None,
        }
    }
}

/// 纹理槽位
///
/// 每个槽位是材质中独立的字段，不会互相覆盖。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    Ambient,
    Emissive,
    Bump,
    Normal,
    SpecularExponent,
    Opacity,
    Displacement,
}

impl TextureSlot {
    /// 全部槽位，顺序与内部存储一致
    pub const ALL: [TextureSlot; 9] = [
        TextureSlot::Diffuse,
        TextureSlot::Specular,
        TextureSlot::Ambient,
        TextureSlot::Emissive,
        TextureSlot::Bump,
        TextureSlot::Normal,
        TextureSlot::SpecularExponent,
        TextureSlot::Opacity,
        TextureSlot::Displacement,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// 纹理贴图引用
///
/// 只记录路径和寻址方式，不解码图像。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureMap {
    /// 贴图路径（相对于材质库文件）
    pub path: String,

    /// `-clamp on` 时为 true
    pub clamp: bool,
}

impl TextureMap {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            clamp: false,
        }
    }
}

/// 材质
///
/// # 默认值
///
/// - 漫反射颜色 (0.6, 0.6, 0.6)，环境光、高光和自发光为黑色
/// - 不透明度 1.0
/// - 折射率 1.0
/// - 光照模型 Gouraud
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// 材质名称
    pub name: String,

    /// 环境光颜色 (`Ka`)
    pub ambient: Color,

    /// 漫反射颜色 (`Kd`)
    pub diffuse: Color,

    /// 高光颜色 (`Ks`)
    pub specular: Color,

    /// 自发光颜色 (`Ke`)
    pub emissive: Color,

    /// 不透明度 (`d`，或 `1 - Tr`)
    pub alpha: f32,

    /// 高光指数 (`Ns`)
    ///
    /// 解析阶段保存原始值，构建场景时乘以配置的缩放系数。
    pub shininess: f32,

    /// 光照模型 (`illum`)
    pub illumination: IlluminationModel,

    /// 折射率 (`Ni`)
    pub index_of_refraction: f32,

    textures: [Option<TextureMap>; 9],
}

impl Material {
    /// 创建一个带默认参数的材质
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Color::BLACK,
            diffuse: Color::gray(DEFAULT_DIFFUSE),
            specular: Color::BLACK,
            emissive: Color::BLACK,
            alpha: 1.0,
            shininess: 0.0,
            illumination: IlluminationModel::default(),
            index_of_refraction: 1.0,
            textures: Default::default(),
        }
    }

    /// 创建名为 `"default"` 的回退材质
    pub fn fallback() -> Self {
        Self::new(DEFAULT_MATERIAL_NAME)
    }

    /// 获取指定槽位的贴图
    pub fn texture(&self, slot: TextureSlot) -> Option<&TextureMap> {
        self.textures[slot.index()].as_ref()
    }

    /// 设置指定槽位的贴图
    pub fn set_texture(&mut self, slot: TextureSlot, map: TextureMap) {
        self.textures[slot.index()] = Some(map);
    }

    /// 遍历所有已设置的贴图
    pub fn textures(&self) -> impl Iterator<Item = (TextureSlot, &TextureMap)> {
        TextureSlot::ALL
            .iter()
            .filter_map(move |&slot| self.texture(slot).map(|map| (slot, map)))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::fallback()
    }
}
