//! 目录扫描

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 列出目录下（不递归）的所有普通文件，按路径排序
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("文件夹不存在: {}", dir.display());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("无法读取文件夹: {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 递归收集指定扩展名的文件，按路径排序
pub async fn collect_files_with_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("文件夹不存在: {}", dir.display());
    }

    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = fs::read_dir(&current)
            .await
            .with_context(|| format!("无法读取文件夹: {}", current.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && has_ext(&path, ext) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// 扩展名比较不区分大小写
pub fn has_ext(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// 文件名去掉扩展名
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
