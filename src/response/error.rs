use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// 数据形状或元素个数与 schema 不符
    MalformedResponse,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::MalformedResponse => f.write_str("malformed response"),
        }
    }
}

/// 解码失败，不返回任何部分结果
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {path}: {reason}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: String,
    reason: String,
}

impl DecodeError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: DecodeErrorKind::MalformedResponse,
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// 出错位置，如 `exit[3][2][0][1]`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
