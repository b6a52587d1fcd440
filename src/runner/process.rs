//! 通过 duct 启动 sysadmin 子进程

use super::types::{RunError, RunOutput};
use super::ProcessRunner;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct DuctRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl DuctRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl ProcessRunner for DuctRunner {
    fn run(&self, args: &[String]) -> Result<RunOutput, RunError> {
        log::debug!("启动 {} {:?}", self.program_name(), args);

        // 以 OsStr 传入：duct 会把单段 Path 改写为 `./name`，跳过 PATH 查找
        let program = self.program.as_os_str().to_owned();

        // 非零退出码不算错误：sysadmin 失败时同样会输出编码后的 Exit
        // stdin 置空，避免子进程读取 TUI 的按键
        let handle = duct::cmd(program, args)
            .stdin_null()
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .start()
            .map_err(|source| RunError::Spawn {
                program: self.program_name(),
                source,
            })?;

        let output = match self.timeout {
            None => handle.wait()?,
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                loop {
                    if let Some(output) = handle.try_wait()? {
                        break output;
                    }
                    if Instant::now() >= deadline {
                        if let Err(e) = handle.kill() {
                            log::warn!("终止 {} 失败: {}", self.program_name(), e);
                        }
                        return Err(RunError::Timeout {
                            program: self.program_name(),
                            timeout,
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        };

        // 被信号终止时没有退出码
        let exit_code = output.status.code().unwrap_or(1);
        log::debug!(
            "{} 退出 (code={}, stdout={}B, stderr={}B)",
            self.program_name(),
            exit_code,
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(RunOutput {
            exit_code,
            stdout: output.stdout.clone(),
            stderr: output.stderr.clone(),
        })
    }

    fn describe(&self) -> String {
        self.program_name()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn captures_stdout_stderr_and_exit_code() {
        let runner = DuctRunner::new("sh");
        let output = runner
            .run(&sh("printf 'abc'; printf 'oops' >&2; exit 3"))
            .expect("run");
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, b"abc");
        assert_eq!(output.stderr_text(), "oops");
    }

    #[test]
    fn bare_program_name_is_resolved_through_path() {
        let runner = DuctRunner::new("printf");
        let output = runner.run(&["ok".to_string()]).expect("run");
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, b"ok");
    }

    #[test]
    fn child_stdin_is_closed() {
        let runner = DuctRunner::new("sh").with_timeout(Some(Duration::from_secs(5)));
        let output = runner.run(&sh("cat; printf done")).expect("run");
        assert_eq!(output.stdout, b"done");
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let runner = DuctRunner::new("/nonexistent/sysadmin-binary");
        let err = runner.run(&[]).unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[test]
    fn slow_child_is_killed_after_timeout() {
        let runner = DuctRunner::new("sh").with_timeout(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = runner.run(&sh("exec sleep 5")).unwrap_err();
        assert!(matches!(err, RunError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn fast_child_finishes_within_timeout() {
        let runner = DuctRunner::new("sh").with_timeout(Some(Duration::from_secs(10)));
        let output = runner.run(&sh("printf ok")).expect("run");
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, b"ok");
    }
}
