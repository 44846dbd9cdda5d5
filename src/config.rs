use crate::atspi::{Discovery, DEFAULT_LIB_NAME, LDCONFIG, LIB_TOKEN};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 通用配置
    #[serde(default)]
    pub general: GeneralConfig,

    /// libatspi 定位配置
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// 显式指定库路径（设置后跳过共享库缓存查找）
    pub path: Option<String>,

    /// 共享库缓存查询工具
    #[serde(default = "default_ldconfig")]
    pub ldconfig: String,

    /// 在缓存输出中匹配的库名标记
    #[serde(default = "default_token")]
    pub token: String,

    /// 查询工具缺失时使用的文件名
    #[serde(default = "default_lib_name")]
    pub default_name: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            ldconfig: default_ldconfig(),
            token: default_token(),
            default_name: default_lib_name(),
        }
    }
}

impl LibraryConfig {
    /// 转换为查找参数
    pub fn discovery(&self) -> Discovery {
        Discovery {
            tool: self.ldconfig.clone(),
            token: self.token.clone(),
            default_name: self.default_name.clone(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ldconfig() -> String {
    LDCONFIG.to_string()
}

fn default_token() -> String {
    LIB_TOKEN.to_string()
}

fn default_lib_name() -> String {
    DEFAULT_LIB_NAME.to_string()
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// 解析 TOML 文本
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// 从默认位置加载，如果不存在则使用默认配置
    pub fn load_or_default() -> Self {
        let candidates = [
            PathBuf::from("config/atspi.toml"),
            PathBuf::from("atspi.toml"),
            dirs_config_path(),
        ];
        Self::load_first(&candidates)
    }

    /// 按顺序尝试候选路径，第一个可解析的生效
    pub fn load_first(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::debug!("Using default configuration");
        Self::default()
    }
}

fn dirs_config_path() -> PathBuf {
    dirs_home().join(".config/atspi-bind/config.toml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// 收集日志输出
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("atspi-bind-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.library.path, None);
        assert_eq!(config.library.ldconfig, "ldconfig");
        assert_eq!(config.library.token, "libatspi");
        assert_eq!(config.library.default_name, "libatspi.so");
    }

    #[test]
    fn test_partial_library_section() {
        let config = AppConfig::parse(
            r#"
            [general]
            log_level = "debug"

            [library]
            ldconfig = "/sbin/ldconfig"
            "#,
        )
        .unwrap();

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.library.ldconfig, "/sbin/ldconfig");
        // 未填写的字段回落到默认值
        assert_eq!(config.library.token, "libatspi");

        let discovery = config.library.discovery();
        assert_eq!(discovery.tool, "/sbin/ldconfig");
        assert_eq!(discovery.default_name, "libatspi.so");
    }

    #[test]
    fn test_explicit_path() {
        let config = AppConfig::parse(
            r#"
            [library]
            path = "/opt/at-spi2/lib/libatspi.so.0"
            "#,
        )
        .unwrap();
        assert_eq!(config.library.path.as_deref(), Some("/opt/at-spi2/lib/libatspi.so.0"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(AppConfig::parse("[library\npath = 1").is_err());
    }

    #[test]
    fn test_load_first_skips_missing_and_invalid() {
        let invalid = temp_config("invalid", "[library\n");
        let valid = temp_config("valid", "[general]\nlog_level = \"trace\"\n");
        let candidates = [PathBuf::from("/nonexistent/atspi.toml"), invalid.clone(), valid.clone()];

        let config = AppConfig::load_first(&candidates);
        assert_eq!(config.general.log_level, "trace");

        let _ = std::fs::remove_file(invalid);
        let _ = std::fs::remove_file(valid);
    }

    #[test]
    fn test_load_first_logs_under_bootstrap_subscriber() {
        // 全局订阅者初始化之前，配置查找的日志由临时订阅者接收
        let valid = temp_config("logged", "[general]\nlog_level = \"warn\"\n");
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            AppConfig::load_first(std::slice::from_ref(&valid))
        });

        assert_eq!(config.general.log_level, "warn");
        assert!(captured.text().contains("Loaded config from"));

        let _ = std::fs::remove_file(valid);
    }
}
