//! 参考答案加载 - 业务能力层
//!
//! 在配置的目录里按顺序查找 `answers.txt` / `answer_key.txt`

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// 支持的答案文件名，按优先级排列
pub const ANSWER_FILE_NAMES: [&str; 2] = ["answers.txt", "answer_key.txt"];

/// 查找第一个非空的答案文件，返回去除首尾空白后的内容
pub async fn load_answer_key<P: AsRef<Path>>(dirs: &[P]) -> Option<String> {
    for dir in dirs {
        for name in ANSWER_FILE_NAMES {
            let path: PathBuf = dir.as_ref().join(name);
            if !path.is_file() {
                continue;
            }
            match fs::read(&path).await {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes).trim().to_string();
                    if !content.is_empty() {
                        info!("✅ 找到答案文件: {}", path.display());
                        info!("答案文件长度: {} 字符", content.chars().count());
                        return Some(content);
                    }
                }
                Err(e) => warn!("读取答案文件失败 {}: {}", path.display(), e),
            }
        }
    }

    info!("未找到有效的答案文件，将使用题目中的答案（如果有）");
    None
}
