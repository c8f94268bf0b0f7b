use std::path::Path;
use thiserror::Error;

/// 应用程序错误类型
///
/// 只用于切分和校验之外的外围流程（配置、文件、LLM 抽取）。
/// 校验问题不会成为错误，而是记录在 `FileReport` 中。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 暂不支持的文档格式
    #[error("不支持的文件格式 .{ext} ({path})，请转换为 .txt 或 .md 后重试（.doc 文件请先另存为 .docx 再导出文本）")]
    UnsupportedFormat { path: String, ext: String },

    /// LLM 服务错误
    #[error("LLM错误 (模型: {model}): {message}")]
    Llm { model: String, message: String },

    /// 抽取结果无法使用
    #[error("抽取失败 ({path}): {message}")]
    Extraction { path: String, message: String },
}

impl AppError {
    /// 创建文件错误
    pub fn file(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// 创建 LLM 错误
    pub fn llm(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Llm {
            model: model.into(),
            message: message.to_string(),
        }
    }

    pub fn extraction(path: impl AsRef<Path>, message: impl std::fmt::Display) -> Self {
        AppError::Extraction {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
