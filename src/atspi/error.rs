//! 错误类型定义

use std::io;
use thiserror::Error;

/// 绑定构造错误
///
/// 加载阶段的所有失败都折叠为 `NotInstalled`，具体原因挂在 `source` 上。
#[derive(Debug, Error)]
pub enum AtspiError {
    #[error("atspi library not installed; install the at-spi2 library or choose another backend")]
    NotInstalled {
        #[source]
        source: LoadFailure,
    },
}

impl AtspiError {
    /// 具体的加载失败原因
    pub fn failure(&self) -> &LoadFailure {
        match self {
            AtspiError::NotInstalled { source } => source,
        }
    }
}

impl From<LoadFailure> for AtspiError {
    fn from(source: LoadFailure) -> Self {
        AtspiError::NotInstalled { source }
    }
}

/// 库定位 / 加载 / 符号绑定的具体失败原因
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("failed to run {tool}: {source}")]
    Discovery {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("no '{token}' entry in the shared library cache")]
    NotFound { token: String },

    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol '{symbol}' not found in '{path}': {source}")]
    Symbol {
        symbol: &'static str,
        path: String,
        #[source]
        source: libloading::Error,
    },
}

/// 几何类型构造错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("invalid rectangle arguments: {0}")]
    InvalidArgument(String),
}

/// 绑定操作结果
pub type AtspiResult<T> = Result<T, AtspiError>;
