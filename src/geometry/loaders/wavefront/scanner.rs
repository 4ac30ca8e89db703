/// 逐行语句扫描器
///
/// 把 OBJ/MTL 文本切分成语句：一个关键字加若干参数。
/// 关键字在扫描时一次性归类为封闭的枚举，解释器只需对枚举做穷尽匹配。
///
/// # 规则
///
/// - 每个物理行是一条语句，参数以空格或制表符分隔
/// - 空行、首个非空白字符为 `#` 的行被跳过
/// - 以 `#` 开头的参数及其后的内容视为行尾注释

use std::iter::Enumerate;
use std::marker::PhantomData;
use std::str::{FromStr, Lines};

use crate::core::error::{ImportError, ImportErrorKind};

/// 关键字分类
pub trait Keyword: Sized {
    fn classify(token: &str) -> Self;
}

/// 一条语句
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'a, K> {
    /// 归类后的关键字
    pub keyword: K,

    /// 关键字原文
    pub token: &'a str,

    /// 参数
    pub args: Vec<&'a str>,

    /// 1 起始的行号
    pub line: usize,

    /// 去除首尾空白后的整行文本
    pub text: &'a str,
}

/// 语句迭代器
pub struct Scanner<'a, K> {
    lines: Enumerate<Lines<'a>>,
    _keyword: PhantomData<K>,
}

impl<'a, K: Keyword> Scanner<'a, K> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            _keyword: PhantomData,
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

impl<'a, K: Keyword> Iterator for Scanner<'a, K> {
    type Item = Statement<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, raw) = self.lines.next()?;
            let text = raw.trim_matches(is_blank);
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let mut tokens = text
                .split(is_blank)
                .filter(|token| !token.is_empty())
                .take_while(|token| !token.starts_with('#'));

            let Some(token) = tokens.next() else {
                continue;
            };

            return Some(Statement {
                keyword: K::classify(token),
                token,
                args: tokens.collect(),
                line: index + 1,
                text,
            });
        }
    }
}

impl<'a, K> Statement<'a, K> {
    /// 构造带行号和语句文本的错误
    pub fn error(&self, kind: ImportErrorKind) -> ImportError {
        ImportError::new(kind).at_line(self.line, self.text)
    }

    /// 第 `index` 个参数
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// 必需的数值参数
    pub fn number<T: FromStr>(&self, index: usize, what: &'static str) -> Result<T, ImportError> {
        match self.arg(index) {
            Some(token) => self.parse_token(token),
            None => Err(self.error(ImportErrorKind::MissingArgument(what))),
        }
    }

    /// 可选的数值参数：缺失时返回 `None`，格式错误仍然是致命错误
    pub fn optional_number<T: FromStr>(&self, index: usize) -> Result<Option<T>, ImportError> {
        self.arg(index).map(|token| self.parse_token(token)).transpose()
    }

    /// 解析任意数值记号
    pub fn parse_token<T: FromStr>(&self, token: &str) -> Result<T, ImportError> {
        token
            .parse()
            .map_err(|_| self.error(ImportErrorKind::InvalidNumber(token.to_string())))
    }

    /// 从 `from` 开始的参数以单个空格重新拼接（名称或路径中可能含空格）
    pub fn rest(&self, from: usize) -> Option<String> {
        match self.args.get(from..) {
            Some(rest) if !rest.is_empty() => Some(rest.join(" ")),
            _ => None,
        }
    }
}
