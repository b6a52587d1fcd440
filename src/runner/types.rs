//! Runner 相关数据类型定义

use std::time::Duration;
use thiserror::Error;

/// 子进程输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutput {
    /// stderr 只用于诊断显示，不参与解码
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("无法启动 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} 在 {}s 内未结束，已终止", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
    #[error("等待子进程时出错: {0}")]
    Io(#[from] std::io::Error),
    #[error("无法读取保存的响应 {path}: {source}")]
    Replay {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 一次 sysadmin 调用：`<output_flag> <subcommand> <args...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub output_flag: String,
    pub subcommand: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(
        output_flag: impl Into<String>,
        subcommand: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            output_flag: output_flag.into(),
            subcommand: subcommand.into(),
            args,
        }
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        args.push(self.output_flag.clone());
        args.push(self.subcommand.clone());
        args.extend(self.args.iter().cloned());
        args
    }

    /// 不含输出格式参数，用于界面显示
    pub fn display(&self) -> String {
        let mut parts = vec![self.subcommand.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }
}
