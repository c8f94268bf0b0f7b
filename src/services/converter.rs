//! 文档转换服务 - 业务能力层
//!
//! 把输入文档转成纯文本。只处理文本类格式，二进制格式返回 `UnsupportedFormat`，
//! 由调用方决定跳过。

use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// 可以直接读取的扩展名
pub const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

pub struct DocumentConverter;

impl DocumentConverter {
    /// 判断文件是否可以直接读取为文本
    pub fn is_supported(path: &Path) -> bool {
        extension_of(path)
            .map(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// 读取文档为纯文本（非 UTF-8 字节按替换字符处理）
    pub async fn to_text(path: &Path) -> AppResult<String> {
        let ext = extension_of(path).unwrap_or_default();
        if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::UnsupportedFormat {
                path: path.display().to_string(),
                ext,
            });
        }

        let bytes = fs::read(path)
            .await
            .map_err(|e| AppError::file(path, e))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        debug!(
            "解析完成 {}，文本长度: {} 字符",
            path.display(),
            content.chars().count()
        );
        Ok(content)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(DocumentConverter::is_supported(Path::new("a.TXT")));
        assert!(DocumentConverter::is_supported(Path::new("b.md")));
        assert!(!DocumentConverter::is_supported(Path::new("c.docx")));
        assert!(!DocumentConverter::is_supported(Path::new("noext")));
    }

    #[test]
    fn test_doc_is_rejected_with_hint() {
        let err = tokio_test::block_on(DocumentConverter::to_text(Path::new("old.doc")))
            .unwrap_err();
        assert!(err.to_string().contains(".docx"));
    }
}
