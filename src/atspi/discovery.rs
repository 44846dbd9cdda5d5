//! 通过共享库缓存定位 libatspi
//!
//! 执行 `ldconfig -p`，在第一条包含库名标记的记录中取 `=>` 之后的路径，
//! 没有 `=>` 时取行首字段。
//! 系统未安装 ldconfig 时退回默认文件名，交给动态链接器按搜索路径解析。

use super::error::LoadFailure;
use std::io::{self, ErrorKind};
use std::process::Command;
use tracing::{debug, info};

/// 库名标记
pub const LIB_TOKEN: &str = "libatspi";
/// ldconfig 不可用时使用的默认文件名
pub const DEFAULT_LIB_NAME: &str = "libatspi.so";
/// 共享库缓存查询工具
pub const LDCONFIG: &str = "ldconfig";

/// 查找参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// 缓存查询工具（名称或路径）
    pub tool: String,
    /// 匹配的库名标记
    pub token: String,
    /// 工具缺失时的回退文件名
    pub default_name: String,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            tool: LDCONFIG.to_string(),
            token: LIB_TOKEN.to_string(),
            default_name: DEFAULT_LIB_NAME.to_string(),
        }
    }
}

impl Discovery {
    /// 解析库路径
    ///
    /// - 工具缺失：`Ok(Some(default_name))`
    /// - 缓存中无匹配：`Ok(None)`
    /// - 工具启动的其他失败或非零退出：`Err(LoadFailure::Discovery)`
    pub fn find_library(&self) -> Result<Option<String>, LoadFailure> {
        debug!("Querying shared library cache: {} -p", self.tool);

        let output = match Command::new(&self.tool).arg("-p").output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "{} not installed, falling back to default library name {}",
                    self.tool, self.default_name
                );
                return Ok(Some(self.default_name.clone()));
            }
            Err(e) => {
                return Err(LoadFailure::Discovery {
                    tool: self.tool.clone(),
                    source: e,
                })
            }
        };

        if !output.status.success() {
            return Err(LoadFailure::Discovery {
                tool: self.tool.clone(),
                source: io::Error::other(format!("exited with {}", output.status)),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let found = parse_cache_listing(&stdout, &self.token);
        match &found {
            Some(path) => info!("Resolved {} to {}", self.token, path),
            None => debug!("No {} entry in {} output", self.token, self.tool),
        }
        Ok(found)
    }

    /// 解析并要求必须找到
    pub fn resolve(&self) -> Result<String, LoadFailure> {
        self.find_library()?.ok_or_else(|| LoadFailure::NotFound {
            token: self.token.clone(),
        })
    }
}

/// 从 `ldconfig -p` 的输出中提取第一条匹配记录的库路径
///
/// 记录形如 `libatspi.so.0 (libc6,x86-64) => /usr/lib/.../libatspi.so.0`，
/// 有 `=>` 时取其后的绝对路径，否则取行首字段。
pub fn parse_cache_listing(listing: &str, token: &str) -> Option<String> {
    let line = listing.lines().find(|line| line.contains(token))?;

    let field = match line.split_once("=>") {
        Some((_, target)) => target.split_whitespace().next(),
        None => None,
    };

    field
        .or_else(|| line.split_whitespace().next())
        .map(str::to_string)
}

/// 使用默认参数查找 libatspi
pub fn find_library() -> Result<Option<String>, LoadFailure> {
    Discovery::default().find_library()
}
