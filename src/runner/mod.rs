//! 进程运行模块 — 对外部 sysadmin 二进制的调用封装

pub mod process;
pub mod replay;
pub mod types;

// 重新导出常用类型
pub use process::DuctRunner;
pub use replay::ReplayRunner;
pub use types::{Invocation, RunError, RunOutput};

/// 运行 sysadmin 并收集输出；解码器测试通过实现此 trait 避免真实进程
pub trait ProcessRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<RunOutput, RunError>;

    /// 日志与界面中显示的名称
    fn describe(&self) -> String;
}
