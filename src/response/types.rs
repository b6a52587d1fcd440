//! sysadmin 响应数据类型
//!
//! 字段声明顺序即线上位置顺序：`rmp-serde` 按声明顺序把结构体编码为数组，
//! 解码器按同样的下标读取。调整字段顺序会破坏兼容性。

use serde::Serialize;

/// 一次 sysadmin 调用的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exit {
    pub(super) exit_code: i32,
    pub(super) real_command: String,
    pub(super) out: String,
    pub(super) packages_response: Option<PackagesResponse>,
    pub(super) error_message: Option<String>,
}

impl Exit {
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// 实际执行的底层命令（如 dnf、apt）
    pub fn real_command(&self) -> &str {
        &self.real_command
    }

    pub fn out(&self) -> &str {
        &self.out
    }

    pub fn packages_response(&self) -> Option<&PackagesResponse> {
        self.packages_response.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// 同时携带结果和错误信息：结构上合法，但语义上不明确，调用方应提示而非猜测
    pub fn has_conflicting_outcome(&self) -> bool {
        self.packages_response.is_some() && self.error_message.is_some()
    }
}

/// packages 子命令的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagesResponse {
    pub(super) subcommand: String,
    pub(super) messages: Vec<String>,
    pub(super) packages: Vec<Package>,
    pub(super) packages_size: Option<String>,
    pub(super) packages_length: Option<u64>,
    pub(super) uninstalled_packages: Vec<Package>,
    pub(super) uninstalled_packages_size: Option<String>,
    pub(super) uninstalled_packages_length: Option<u64>,
}

impl PackagesResponse {
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// 保持 sysadmin 给出的顺序
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn packages_size(&self) -> Option<&str> {
        self.packages_size.as_deref()
    }

    /// sysadmin 报告的数量，与 `packages().len()` 无关
    pub fn packages_length(&self) -> Option<u64> {
        self.packages_length
    }

    pub fn uninstalled_packages(&self) -> &[Package] {
        &self.uninstalled_packages
    }

    pub fn uninstalled_packages_size(&self) -> Option<&str> {
        self.uninstalled_packages_size.as_deref()
    }

    pub fn uninstalled_packages_length(&self) -> Option<u64> {
        self.uninstalled_packages_length
    }
}

/// 单个软件包
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub(super) name: String,
    pub(super) arch: String,
    pub(super) version: Option<String>,
    /// 有待升级时为升级前的版本
    pub(super) old_version: Option<String>,
    pub(super) repository: Option<String>,
    pub(super) size: Option<String>,
    pub(super) download: Option<String>,
    pub(super) description: Option<String>,
    pub(super) url: Option<String>,
    pub(super) license: Option<String>,
    pub(super) installed: Option<bool>,
}

impl Package {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn old_version(&self) -> Option<&str> {
        self.old_version.as_deref()
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn download(&self) -> Option<&str> {
        self.download.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn installed(&self) -> Option<bool> {
        self.installed
    }

    pub fn has_pending_upgrade(&self) -> bool {
        self.old_version.is_some()
    }
}
