//! 核心功能模块
//!
//! 本模块提供了导入器的基础功能，包括数学类型、日志系统、配置管理和错误处理。
//! 这些模块独立于具体的文件格式。
//!
//! # 模块组织
//!
//! - `math`：数学类型（向量、矩阵、颜色）
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从 TOML 文件加载导入选项
//! - `error`：错误处理，定义统一的错误类型

pub mod config;
pub mod error;
pub mod log;
pub mod math;

// 重新导出常用类型，方便使用
pub use config::{Config, ImportConfig};
pub use error::{ImportError, ImportErrorKind, Result, SceneError};
pub use math::{Color, Matrix4, Vector2, Vector3};
