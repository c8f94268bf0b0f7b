//! 单个文件处理器 - 编排层
//!
//! 只处理一个文件：读取、调用能力层、写出结果。
//! 不关心并发和汇总，这些由 `batch_processor` 负责。

use crate::error::AppError;
use crate::models::FileReport;
use crate::services::chunker::{part_file_name, Chunker};
use crate::services::converter::DocumentConverter;
use crate::services::extractor::{build_user_message, clean_response, Extractor};
use crate::services::validator;
use crate::utils::files::file_stem;
use crate::utils::truncate_text;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// 切分单个大文件，返回写出的片段路径
pub async fn split_file(
    chunker: Chunker,
    path: PathBuf,
    output_dir: PathBuf,
    file_index: usize,
) -> Result<Vec<PathBuf>> {
    let name = display_name(&path);
    info!("[文件 {}] 开始切分: {}", file_index, name);

    let content = DocumentConverter::to_text(&path).await?;
    info!(
        "[文件 {}] 解析完成，文本长度: {} 字符",
        file_index,
        content.chars().count()
    );

    let chunks = tokio::task::spawn_blocking(move || chunker.split(&content))
        .await
        .context("切分任务异常退出")?;

    fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| AppError::file(&output_dir, e))?;

    let stem = file_stem(&path);
    let mut written = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let out_path = output_dir.join(part_file_name(&stem, chunk.index, "txt"));
        fs::write(&out_path, &chunk.text)
            .await
            .map_err(|e| AppError::file(&out_path, e))?;
        info!(
            "[文件 {}] 保存片段 {}/{}: {}",
            file_index,
            chunk.index,
            chunks.len(),
            display_name(&out_path)
        );
        written.push(out_path);
    }

    info!(
        "[文件 {}] ✅ 共切分为 {} 个部分 -> {}",
        file_index,
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

/// 把单个文档转换成中间文本 `<stem>.md`
pub async fn convert_file(
    path: PathBuf,
    output_dir: PathBuf,
    file_index: usize,
) -> Result<PathBuf> {
    info!("[文件 {}] 转换文件: {}", file_index, display_name(&path));

    let content = DocumentConverter::to_text(&path).await?;

    fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| AppError::file(&output_dir, e))?;
    let out_path = output_dir.join(format!("{}.md", file_stem(&path)));
    fs::write(&out_path, content)
        .await
        .map_err(|e| AppError::file(&out_path, e))?;

    info!("[文件 {}] ✓ 已保存: {}", file_index, out_path.display());
    Ok(out_path)
}

/// 抽取单个中间文件为题目 JSON，写出后立即校验
///
/// JSON 无法解析时返回错误且不写文件；写出的文件一定是合法 JSON。
pub async fn extract_file<E: Extractor>(
    extractor: &E,
    path: &Path,
    answer_key: Option<&str>,
    output_dir: &Path,
    file_index: usize,
) -> Result<FileReport> {
    info!("[文件 {}] 处理文件: {}", file_index, display_name(path));

    let bytes = fs::read(path).await.map_err(|e| AppError::file(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    if answer_key.is_some() {
        info!("[文件 {}] 检测到全局答案，将注入到AI输入中", file_index);
    }
    let user_message = build_user_message(&content, answer_key);

    info!("[文件 {}] 🤖 调用大模型API处理内容...", file_index);
    let raw = extractor.extract(&user_message).await?;
    let cleaned = clean_response(&raw);

    let records: serde_json::Value = serde_json::from_str(cleaned).map_err(|e| {
        AppError::extraction(
            path,
            format!(
                "JSON解析失败: {}，响应内容预览: {}",
                e,
                truncate_text(cleaned, 200)
            ),
        )
    })?;
    let pretty = serde_json::to_string_pretty(&records)
        .map_err(|e| AppError::extraction(path, e))?;

    fs::create_dir_all(output_dir)
        .await
        .map_err(|e| AppError::file(output_dir, e))?;
    let out_path = output_dir.join(format!("{}.json", file_stem(path)));
    fs::write(&out_path, &pretty)
        .await
        .map_err(|e| AppError::file(&out_path, e))?;
    info!("[文件 {}] ✅ 成功保存到: {}", file_index, out_path.display());

    let report = validator::validate_bytes(&out_path.display().to_string(), pretty.as_bytes());
    if report.status.is_pass() {
        info!(
            "[文件 {}] ✓ 校验通过，题目数量: {}",
            file_index, report.total_questions
        );
    } else {
        warn!(
            "[文件 {}] ⚠️ 校验未通过: {}/{} 道题目有问题",
            file_index, report.failed_questions, report.total_questions
        );
    }
    Ok(report)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
