//! 配置管理模块
//!
//! 提供导入器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持通过代码构建。
//!
//! # 配置文件格式 (wavefront_scene.toml)
//!
//! ```toml
//! [import]
//! min_file_size = 16      # 小于此字节数的文件视为无效 OBJ
//! shininess_scale = 4.0   # 导出时 Ns 的缩放系数
//! follow_mtllib = true    # 是否加载 mtllib 引用的材质库
//! flip_texcoord_v = false # 导出时是否翻转 V 坐标（1.0 - v）
//!
//! [logging]
//! level = "info"          # trace, debug, info, warn, error
//! file_output = false
//! log_file = "wavefront_scene.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};

/// 导入器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 导入配置
    #[serde(default)]
    pub import: ImportConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 导入配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 最小文件大小（字节）
    #[serde(default = "default_min_file_size")]
    pub min_file_size: usize,

    /// 高光指数缩放系数
    ///
    /// OBJ 的 `Ns` 与渲染器约定的范围不同，导出时乘以该系数。
    #[serde(default = "default_shininess_scale")]
    pub shininess_scale: f32,

    /// 是否解析 `mtllib` 引用的材质库
    #[serde(default = "default_follow_mtllib")]
    pub follow_mtllib: bool,

    /// 导出时翻转 V 坐标
    #[serde(default)]
    pub flip_texcoord_v: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_min_file_size() -> usize { 16 }
fn default_shininess_scale() -> f32 { 4.0 }
fn default_follow_mtllib() -> bool { true }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "wavefront_scene.log".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            import: ImportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            min_file_size: default_min_file_size(),
            shininess_scale: default_shininess_scale(),
            follow_mtllib: default_follow_mtllib(),
            flip_texcoord_v: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    ///
    /// 成功返回 `Config` 实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从配置文件加载，如果文件不存在或无效则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 验证配置的有效性
    ///
    /// # 返回值
    ///
    /// 配置有效返回 `Ok(())`，否则返回错误
    pub fn validate(&self) -> Result<()> {
        let scale = self.import.shininess_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "import.shininess_scale".to_string(),
                reason: format!("must be a positive finite number, got {}", scale),
            }
            .into());
        }

        if self.logging.file_output && self.logging.log_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.log_file".to_string(),
                reason: "file output is enabled but no log file is set".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
