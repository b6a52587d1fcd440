//! 回放保存的响应，不启动任何进程

use super::types::{RunError, RunOutput};
use super::ProcessRunner;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ReplayRunner {
    path: PathBuf,
}

impl ReplayRunner {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProcessRunner for ReplayRunner {
    /// 参数被忽略，缓冲区原样返回
    fn run(&self, _args: &[String]) -> Result<RunOutput, RunError> {
        let stdout = fs::read(&self.path).map_err(|source| RunError::Replay {
            path: self.path.display().to_string(),
            source,
        })?;
        log::debug!("回放 {} ({}B)", self.path.display(), stdout.len());
        Ok(RunOutput {
            exit_code: 0,
            stdout,
            stderr: Vec::new(),
        })
    }

    fn describe(&self) -> String {
        format!("replay:{}", self.path.display())
    }
}
