use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// sysadmin 可执行文件
    pub binary: PathBuf,
    /// 请求结构化输出的参数
    pub output_flag: String,
    /// 0 表示不限时
    pub timeout_secs: u64,
    pub subcommand: String,
    pub default_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("sysadmin"),
            output_flag: "-o=msgpack".to_string(),
            timeout_secs: 30,
            subcommand: "packages".to_string(),
            default_args: vec!["list".to_string()],
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/sysadmin-view/config.toml")
    }

    /// 配置文件不存在时使用默认值；SYSADMIN_BIN 环境变量覆盖 binary
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            Self::default()
        };

        if let Ok(binary) = std::env::var("SYSADMIN_BIN") {
            if !binary.trim().is_empty() {
                config.binary = PathBuf::from(binary);
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
