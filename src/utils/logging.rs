//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// 初始化运行日志文件，写入带时间戳的标题
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nMist_Parser 运行日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `task`: 当前任务名称
/// - `max_concurrent`: 最大并发数
pub fn log_startup(task: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 Mist_Parser 启动 - {}", task);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录扫描结果
pub fn log_files_found(dir: &Path, files: &[std::path::PathBuf]) {
    info!("✓ 在 {} 中发现 {} 个文件待处理:", dir.display(), files.len());
    for file in files {
        info!(
            "  * {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        );
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
