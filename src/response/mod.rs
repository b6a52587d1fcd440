//! sysadmin 响应模块 — 解码 `-o=msgpack` 输出的位置数组

mod decoder;
mod error;
mod schema;
mod types;

pub use decoder::{decode_buffer, decode_exit, decode_package, decode_packages_response};
pub use error::{DecodeError, DecodeErrorKind};
pub use types::{Exit, Package, PackagesResponse};
