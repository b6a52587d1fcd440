//! sysadmin-view — sysadmin 包管理器的终端前端
//!
//! 执行 `sysadmin -o=msgpack ...`，把位置编码的 MessagePack 响应解码为
//! [`response::Exit`]，再以纯文本、JSON 或 TUI 展示。

pub mod config;
pub mod loader;
pub mod render;
pub mod response;
pub mod runner;
pub mod tui;
