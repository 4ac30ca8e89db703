//! 数学类型模块
//!
//! 基于 `nalgebra` 提供导入器使用的向量、矩阵和颜色类型。
//! 解析阶段的数据池使用 nalgebra 向量，输出的场景图使用 `[f32; N]` 数组，
//! 与具体渲染器解耦。

pub use nalgebra::{Matrix4 as Mat4, Vector2 as Vec2, Vector3 as Vec3};

// 类型别名，使用更简洁的名称
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Matrix4 = Mat4<f32>;

/// 颜色类型（RGBA，线性空间，范围 0.0-1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// 创建新的颜色
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 创建 RGB 颜色（alpha = 1.0）
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// 创建灰度颜色（alpha = 1.0）
    pub fn gray(value: f32) -> Self {
        Self::rgb(value, value, value)
    }

    /// 转换为 RGB 数组（忽略 alpha）
    pub fn to_rgb_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_constructors() {
        let grey = Color::gray(0.6);
        assert_eq!(grey.to_rgb_array(), [0.6, 0.6, 0.6]);
        assert_eq!(grey.a, 1.0);
        assert_eq!(Color::default(), Color::BLACK);
    }
}
