//! 错误处理模块
//!
//! 定义了导入器中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息（文件、行号、语句）
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理
//!
//! 致命错误通过 `Result` 返回并终止整个导入；
//! 可恢复的问题记录为 [`Diagnostic`](crate::geometry::loaders::Diagnostic)，不在此处定义。

use std::fmt;
use std::path::PathBuf;

/// 导入器统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, SceneError>;

/// 顶层错误类型
#[derive(Debug)]
pub enum SceneError {
    /// 配置错误
    Config(ConfigError),

    /// 模型导入错误
    Import(ImportError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 导入过程中的致命错误
///
/// 携带出错的文件、行号和原始语句（如果有），
/// 便于定位格式错误的模型文件。
#[derive(Debug)]
pub struct ImportError {
    /// 出错的文件（从内存导入时可能为空）
    pub file: Option<PathBuf>,

    /// 1 起始的行号
    pub line: Option<usize>,

    /// 出错的原始语句文本
    pub statement: Option<String>,

    /// 具体错误
    pub kind: ImportErrorKind,
}

/// 致命错误的具体类别
#[derive(Debug)]
pub enum ImportErrorKind {
    /// 文件不存在
    FileNotFound,

    /// 没有加载器支持的文件扩展名
    UnsupportedFormat(String),

    /// 文件读取失败
    Unreadable(std::io::Error),

    /// 文件过小，不可能是有效的 OBJ
    FileTooSmall { size: usize, minimum: usize },

    /// 必需的数值无法解析
    InvalidNumber(String),

    /// 语句缺少必需的参数
    MissingArgument(&'static str),

    /// 索引 0 在 OBJ 中无效
    ZeroIndex,

    /// 相对索引指向数据池起始位置之前
    RelativeIndexUnderflow { index: i64, pool_len: usize },

    /// 面顶点引用超出数据池范围
    IndexOutOfRange {
        pool: &'static str,
        index: usize,
        pool_len: usize,
    },

    /// 网格包含面但没有输出任何顶点
    EmptyMesh { object: String },

    /// MTL 语句出现在任何 `newmtl` 之前
    MissingNewMtl { keyword: String },
}

impl ImportError {
    /// 创建一个不带位置信息的错误
    pub fn new(kind: ImportErrorKind) -> Self {
        Self {
            file: None,
            line: None,
            statement: None,
            kind,
        }
    }

    /// 附加文件信息（已存在时不覆盖）
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        if self.file.is_none() {
            self.file = Some(file.into());
        }
        self
    }

    /// 附加行号和语句文本
    pub fn at_line(mut self, line: usize, statement: impl Into<String>) -> Self {
        self.line = Some(line);
        self.statement = Some(statement.into());
        self
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Config(e) => write!(f, "Configuration error: {}", e),
            SceneError::Import(e) => write!(f, "Import error: {}", e),
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Log(msg) => write!(f, "Log error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: ", file.display(), line)?,
            (Some(file), None) => write!(f, "{}: ", file.display())?,
            (None, Some(line)) => write!(f, "line {}: ", line)?,
            (None, None) => {}
        }
        write!(f, "{}", self.kind)?;
        if let Some(statement) = &self.statement {
            write!(f, " (in \"{}\")", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for ImportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportErrorKind::FileNotFound => write!(f, "file not found"),
            ImportErrorKind::UnsupportedFormat(extension) => {
                write!(f, "unsupported file format '{}'", extension)
            }
            ImportErrorKind::Unreadable(e) => write!(f, "failed to read file: {}", e),
            ImportErrorKind::FileTooSmall { size, minimum } => write!(
                f,
                "file is {} bytes, too small to be an OBJ model (minimum {})",
                size, minimum
            ),
            ImportErrorKind::InvalidNumber(token) => write!(f, "invalid number '{}'", token),
            ImportErrorKind::MissingArgument(what) => write!(f, "missing argument: {}", what),
            ImportErrorKind::ZeroIndex => write!(f, "index 0 is not a valid OBJ index"),
            ImportErrorKind::RelativeIndexUnderflow { index, pool_len } => write!(
                f,
                "relative index {} points before the start of a pool of {} elements",
                index, pool_len
            ),
            ImportErrorKind::IndexOutOfRange {
                pool,
                index,
                pool_len,
            } => write!(
                f,
                "{} index {} is out of range ({} available)",
                pool,
                index + 1,
                pool_len
            ),
            ImportErrorKind::EmptyMesh { object } => write!(
                f,
                "mesh of object '{}' has faces but emits no vertices",
                object
            ),
            ImportErrorKind::MissingNewMtl { keyword } => write!(
                f,
                "'{}' statement appears before any 'newmtl'",
                keyword
            ),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Import(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ImportErrorKind::Unreadable(e) => Some(e),
            _ => None,
        }
    }
}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for SceneError {
    fn from(err: std::io::Error) -> Self {
        SceneError::Io(err)
    }
}

impl From<ConfigError> for SceneError {
    fn from(err: ConfigError) -> Self {
        SceneError::Config(err)
    }
}

impl From<ImportError> for SceneError {
    fn from(err: ImportError) -> Self {
        SceneError::Import(err)
    }
}

impl From<ImportErrorKind> for ImportError {
    fn from(kind: ImportErrorKind) -> Self {
        ImportError::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_display_with_location() {
        let err = ImportError::new(ImportErrorKind::InvalidNumber("1.x".to_string()))
            .in_file("model.obj")
            .at_line(7, "v 1.x 0 0");

        let text = err.to_string();
        assert!(text.starts_with("model.obj:7: "));
        assert!(text.contains("invalid number '1.x'"));
        assert!(text.contains("v 1.x 0 0"));
    }

    #[test]
    fn test_in_file_keeps_first_file() {
        let err = ImportError::new(ImportErrorKind::ZeroIndex)
            .in_file("inner.mtl")
            .in_file("outer.obj");

        assert_eq!(err.file, Some(PathBuf::from("inner.mtl")));
    }

    #[test]
    fn test_index_out_of_range_is_reported_one_based() {
        let kind = ImportErrorKind::IndexOutOfRange {
            pool: "position",
            index: 4,
            pool_len: 3,
        };
        assert_eq!(kind.to_string(), "position index 5 is out of range (3 available)");
    }

    #[test]
    fn test_scene_error_conversion() {
        let err: SceneError = ImportError::new(ImportErrorKind::FileNotFound).into();
        assert!(matches!(err, SceneError::Import(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
