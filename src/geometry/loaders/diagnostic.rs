/// 可恢复问题的诊断信息
///
/// 导入过程中遇到不影响结果完整性的问题时记录一条诊断并继续处理，
/// 同时通过 `tracing` 以 warn 级别输出。

use std::fmt;
use std::path::{Path, PathBuf};

/// 一条诊断信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 描述
    pub message: String,

    /// 来源文件（从内存导入时为空）
    pub file: Option<PathBuf>,

    /// 1 起始的行号
    pub line: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: {}", file.display(), line, self.message),
            (Some(file), None) => write!(f, "{}: {}", file.display(), self.message),
            (None, Some(line)) => write!(f, "line {}: {}", line, self.message),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

/// 诊断信息收集器
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 记录一条诊断
    pub(crate) fn report(&mut self, file: Option<&Path>, line: Option<usize>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            message: message.into(),
            file: file.map(Path::to_path_buf),
            line,
        };
        crate::import_warn!(
            file = %diagnostic.file.as_deref().unwrap_or(Path::new("<memory>")).display(),
            line = diagnostic.line.unwrap_or(0),
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
