/// 文件访问抽象
///
/// 导入器不直接访问文件系统，所有读取都经过 [`FileSystem`]。
/// 调用方可以提供真实文件系统，也可以在测试中使用内存文件系统。

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// 文件访问能力
pub trait FileSystem {
    /// 打开文件，文件不存在时返回 `io::ErrorKind::NotFound`
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// 文件是否存在
    fn exists(&self, path: &Path) -> bool;

    /// 文件所在目录，用于解析相对路径
    fn directory_of(&self, path: &Path) -> PathBuf {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    /// 读取整个文件
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut reader = self.open(path)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// 基于 `std::fs` 的文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// 内存文件系统
///
/// 路径按原样比较，不做规范化。
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文件（构建器风格）
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// 添加或替换文件
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSystem for MemoryFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        match self.files.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}
