//! # Mist Parser
//!
//! 把试卷类文档切分成适合 LLM 抽取的片段，并校验抽取出的题目 JSON
//!
//! ## 架构设计
//!
//! ### ① 数据模型（Models）
//! - `models/` - 切分配置与片段、题目结构、校验报告
//!
//! ### ② 业务能力层（Services）
//! - `Chunker` - 基于题号锚点的文本切分（纯函数）
//! - `validator` - 题目 JSON 结构校验（纯函数）
//! - `DocumentConverter` - 文档转纯文本
//! - `LlmExtractor` - 调用 LLM 抽取题目
//! - `report` - 报告渲染
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理并发和汇总
//! - `orchestrator/file_processor` - 单个文件处理器
//!
//! 切分和校验没有全局状态，配置通过 `Config` 显式传入。

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Chunk, ChunkConfig, FileReport, QuizRecord, ReportStatus, SummaryReport};
pub use orchestrator::App;
pub use services::{chunk, validate_all, validate_file, Chunker};
