use clap::Parser;
use std::path::PathBuf;
use sysadmin_view::config::Config;
use sysadmin_view::runner::Invocation;

/// 运行 sysadmin 并查看其结构化输出
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 配置文件（默认 ~/.config/sysadmin-view/config.toml）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// sysadmin 可执行文件
    #[arg(short, long)]
    pub binary: Option<PathBuf>,

    /// 超时秒数，0 表示不限时
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// 回放保存的 msgpack 响应而不执行 sysadmin
    #[arg(short, long, conflicts_with = "binary")]
    pub input: Option<PathBuf>,

    /// 保存原始 msgpack 响应
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// 输出纯文本而不进入 TUI
    #[arg(long, conflicts_with = "json")]
    pub plain: bool,

    /// 输出 JSON 而不进入 TUI
    #[arg(long)]
    pub json: bool,

    /// 子命令及其参数，如 `packages list gitui`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Args {
    /// 命令行参数覆盖配置文件
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(binary) = &self.binary {
            config.binary = binary.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }

    pub fn invocation(&self, config: &Config) -> Invocation {
        match self.command.split_first() {
            Some((subcommand, args)) => {
                Invocation::new(config.output_flag.clone(), subcommand.clone(), args.to_vec())
            }
            None => Invocation::new(
                config.output_flag.clone(),
                config.subcommand.clone(),
                config.default_args.clone(),
            ),
        }
    }

    pub fn interactive(&self) -> bool {
        !self.plain && !self.json
    }
}
