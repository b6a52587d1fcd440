//! 纯文本渲染（--plain 与 TUI 输出页共用）

use crate::response::{Exit, Package, PackagesResponse};

/// 单行包摘要：名称.架构  版本  [仓库]  大小  (已安装)
pub fn package_line(package: &Package) -> String {
    let mut line = format!("{}.{}", package.name(), package.arch());

    match (package.old_version(), package.version()) {
        (Some(old), Some(new)) => line.push_str(&format!("  {old} -> {new}")),
        (Some(old), None) => line.push_str(&format!("  {old} -> ?")),
        (None, Some(version)) => line.push_str(&format!("  {version}")),
        (None, None) => {}
    }
    if let Some(repo) = package.repository() {
        line.push_str(&format!("  [{repo}]"));
    }
    if let Some(size) = package.size() {
        line.push_str(&format!("  {size}"));
    }
    if package.installed() == Some(true) {
        line.push_str("  (已安装)");
    }
    line
}

/// 包详情，未设置的字段不显示
pub fn package_detail_lines(package: &Package) -> Vec<String> {
    let mut lines = vec![
        format!("名称: {}", package.name()),
        format!("架构: {}", package.arch()),
    ];
    let optional = [
        ("版本", package.version()),
        ("旧版本", package.old_version()),
        ("仓库", package.repository()),
        ("大小", package.size()),
        ("下载", package.download()),
        ("描述", package.description()),
        ("主页", package.url()),
        ("许可证", package.license()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
    match package.installed() {
        Some(true) => lines.push("已安装: 是".to_string()),
        Some(false) => lines.push("已安装: 否".to_string()),
        None => {}
    }
    lines
}

/// "共 N 个" 加上 sysadmin 报告的大小与数量
fn summary(count: usize, size: Option<&str>, reported: Option<u64>) -> String {
    let mut text = format!("共 {count} 个");
    if let Some(size) = size {
        text.push_str(&format!("，{size}"));
    }
    if let Some(reported) = reported {
        if reported != count as u64 {
            text.push_str(&format!("（报告 {reported} 个）"));
        }
    }
    text
}

pub fn packages_summary(response: &PackagesResponse) -> String {
    summary(
        response.packages().len(),
        response.packages_size(),
        response.packages_length(),
    )
}

pub fn uninstalled_summary(response: &PackagesResponse) -> String {
    summary(
        response.uninstalled_packages().len(),
        response.uninstalled_packages_size(),
        response.uninstalled_packages_length(),
    )
}

pub fn exit_lines(exit: &Exit) -> Vec<String> {
    let mut lines = vec![
        format!("命令: {}", exit.real_command()),
        format!("退出码: {}", exit.exit_code()),
    ];

    if exit.has_conflicting_outcome() {
        lines.push("⚠ 响应同时包含结果与错误信息，请以错误信息为准核对".to_string());
    }

    if let Some(response) = exit.packages_response() {
        lines.push(String::new());
        lines.push(format!("── {} ──", response.subcommand()));
        for message in response.messages() {
            lines.push(format!(":: {message}"));
        }

        lines.push(String::new());
        lines.push(format!("软件包（{}）", packages_summary(response)));
        for package in response.packages() {
            lines.push(format!("  {}", package_line(package)));
        }

        if !response.uninstalled_packages().is_empty()
            || response.uninstalled_packages_length().is_some()
        {
            lines.push(String::new());
            lines.push(format!("未安装（{}）", uninstalled_summary(response)));
            for package in response.uninstalled_packages() {
                lines.push(format!("  {}", package_line(package)));
            }
        }
    }

    if !exit.out().trim().is_empty() {
        lines.push(String::new());
        lines.push("── 输出 ──".to_string());
        lines.extend(exit.out().lines().map(str::to_string));
    }

    if let Some(error) = exit.error_message() {
        lines.push(String::new());
        lines.push(format!("⚠ 错误: {error}"));
    }

    lines
}
