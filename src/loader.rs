//! 调用 sysadmin 并解码其输出

use crate::response::{decode_buffer, DecodeError, Exit};
use crate::runner::{Invocation, ProcessRunner, RunError};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// 一次成功解码的加载结果
#[derive(Debug, Clone)]
pub struct Loaded {
    pub exit: Exit,
    /// 进程本身的退出码，可能与 `exit.exit_code()` 不同
    pub process_exit_code: i32,
    pub stderr: String,
    pub raw: Vec<u8>,
    pub loaded_at: DateTime<Local>,
}

impl Loaded {
    /// 保存原始响应，之后可用 `--input` 回放
    pub fn save_raw(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &self.raw)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("无法解析 sysadmin 的响应 (退出码 {exit_code}): {source}")]
    Decode {
        #[source]
        source: DecodeError,
        exit_code: i32,
        stderr: String,
    },
}

impl LoadError {
    /// 进程的 stderr，便于在解码失败时展示
    pub fn stderr(&self) -> Option<&str> {
        match self {
            LoadError::Decode { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

pub fn load(runner: &dyn ProcessRunner, invocation: &Invocation) -> Result<Loaded, LoadError> {
    log::info!("执行 {} {}", runner.describe(), invocation.display());

    let output = runner.run(&invocation.to_args())?;
    let stderr = output.stderr_text();
    log::debug!(
        "收到响应: code={}, stdout={}B, stderr={}B",
        output.exit_code,
        output.stdout.len(),
        output.stderr.len()
    );

    let exit = match decode_buffer(&output.stdout) {
        Ok(exit) => exit,
        Err(source) => {
            log::warn!("解码失败: {}", source);
            return Err(LoadError::Decode {
                source,
                exit_code: output.exit_code,
                stderr,
            });
        }
    };

    if exit.exit_code() != output.exit_code {
        log::warn!(
            "进程退出码 {} 与响应中的 exit_code {} 不一致",
            output.exit_code,
            exit.exit_code()
        );
    }
    if exit.has_conflicting_outcome() {
        log::warn!("响应同时包含 packages_response 与 error_message");
    }

    Ok(Loaded {
        exit,
        process_exit_code: output.exit_code,
        stderr,
        raw: output.stdout,
        loaded_at: Local::now(),
    })
}
