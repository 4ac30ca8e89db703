//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! 导入器内部通过 `import_*!` 宏记录日志，统一使用 `wavefront_scene::import` 目标，
//! 可恢复的诊断信息同时以 `warn` 级别输出。是否安装订阅者由调用方决定，
//! 不调用 [`init_logger`] 时日志会被静默丢弃。
//!
//! # 使用示例
//!
//! ```no_run
//! use wavefront_scene::core::log;
//! use wavefront_scene::core::config::LogLevel;
//!
//! // 仅控制台输出
//! log::init_logger(LogLevel::Info, false, None);
//! ```

use std::path::Path;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use super::config::{LogLevel, LoggingConfig};
use super::error::{Result, SceneError};

/// 初始化日志系统
///
/// 整个进程只能成功调用一次，重复调用会返回 `SceneError::Log`。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "wavefront_scene.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let filter = EnvFilter::new(level_directive(level));

    if file_output {
        // 解析日志文件路径
        let log_path = log_file_path.unwrap_or("wavefront_scene.log");
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("wavefront_scene.log");

        // 创建滚动文件 appender（每天滚动）
        let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, filename);

        let console_layer = fmt::layer().with_target(true).with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false) // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| SceneError::Log(e.to_string()))
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| SceneError::Log(e.to_string()))
    }
}

/// 按配置初始化日志系统
pub fn init_from_config(config: &LoggingConfig) -> Result<()> {
    init_logger(config.level, config.file_output, Some(&config.log_file))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// 导入器日志 - Debug 级别
#[macro_export]
macro_rules! import_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "wavefront_scene::import", $($arg)*)
    };
}

/// 导入器日志 - Info 级别
#[macro_export]
macro_rules! import_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "wavefront_scene::import", $($arg)*)
    };
}

/// 导入器日志 - Warn 级别
#[macro_export]
macro_rules! import_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "wavefront_scene::import", $($arg)*)
    };
}

/// 性能追踪宏
///
/// 创建一个 TRACE 级别的 span，进入后在作用域结束时关闭。
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::span!(tracing::Level::TRACE, $name)
    };
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
