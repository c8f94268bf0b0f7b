//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **扫描目录**：找出待处理的文件
//! 2. **并发控制**：使用 Semaphore 限制同时处理的文件数量
//! 3. **委托处理**：单个文件交给 `file_processor`
//! 4. **汇总统计**：按输入顺序依次折叠每个文件的结果
//!
//! 汇总只在等待任务结束的循环里进行，不存在多个写入者。

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ErrorKind, FileReport, SummaryReport, ValidationError, POSITION_NA};
use crate::orchestrator::file_processor;
use crate::services::answer_key::{load_answer_key, ANSWER_FILE_NAMES};
use crate::services::chunker::Chunker;
use crate::services::converter::DocumentConverter;
use crate::services::extractor::{Extractor, LlmExtractor};
use crate::services::report::render_summary;
use crate::services::validator;
use crate::utils::files::{collect_files_with_ext, has_ext, list_files};
use crate::utils::logging::{init_log_file, log_files_found, log_startup, print_final_stats};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::fs::OpenOptions;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 校验结果：每个文件的报告和汇总
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub reports: Vec<FileReport>,
    pub summary: SummaryReport,
}

/// 应用主结构
pub struct App {
    config: Config,
    log_file: Option<String>,
}

impl App {
    /// 创建应用，不写日志文件
    pub fn new(config: Config) -> Self {
        Self {
            config,
            log_file: None,
        }
    }

    /// 初始化应用并创建运行日志文件
    pub fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        let log_file = Some(config.output_log_file.clone());
        Ok(Self { config, log_file })
    }

    /// 切分 `input_large_dir` 下的所有文件
    pub async fn split_all(&self) -> Result<ProcessingStats> {
        log_startup("文档切分", self.config.concurrency());
        let chunk_config = self.config.chunk_config()?;
        info!(
            "切分目标大小: {} 字符/片段，向后查找范围: {} 字符",
            chunk_config.target_size, chunk_config.lookahead_range
        );

        let dir = &self.config.input_large_dir;
        let files = list_files(dir).await?;
        if files.is_empty() {
            warn!("⚠️ {} 目录中没有文件，请将待处理的大文件放入该目录", dir.display());
            return Ok(ProcessingStats::default());
        }
        log_files_found(dir, &files);

        let chunker = Chunker::new(chunk_config);
        let output_dir = self.config.split_output_dir.clone();
        let results = self
            .run_bounded(files, move |idx, path| {
                file_processor::split_file(chunker, path, output_dir.clone(), idx)
            })
            .await;

        let stats = self.tally("切分", &results);
        self.finish(&stats);
        Ok(stats)
    }

    /// 把 `input_dir` 下的文档转换为中间文本
    pub async fn convert_all(&self) -> Result<ProcessingStats> {
        log_startup("文档转换", self.config.concurrency());

        let dir = &self.config.input_dir;
        let files: Vec<PathBuf> = list_files(dir)
            .await?
            .into_iter()
            .filter(|p| !is_answer_file(p))
            .collect();
        if files.is_empty() {
            warn!("⚠️ 输入目录中没有文件，请将待处理的文档放入 {}", dir.display());
            return Ok(ProcessingStats::default());
        }
        log_files_found(dir, &files);

        let (files, unsupported): (Vec<PathBuf>, Vec<PathBuf>) = files
            .into_iter()
            .partition(|p| DocumentConverter::is_supported(p));
        for path in &unsupported {
            warn!("⚠️ 暂不支持的文件类型，跳过: {}", path.display());
        }

        let output_dir = self.config.intermediate_dir.clone();
        let results = self
            .run_bounded(files, move |idx, path| {
                file_processor::convert_file(path, output_dir.clone(), idx)
            })
            .await;

        let stats = self.tally("转换", &results);
        self.finish(&stats);
        Ok(stats)
    }

    /// 使用配置中的 LLM 抽取所有中间文件
    pub async fn extract_all(&self) -> Result<CheckOutcome> {
        let extractor = LlmExtractor::new(&self.config)?;
        info!("API基础URL: {}", self.config.llm_api_base_url);
        info!("模型名称: {}", extractor.model_name());
        self.extract_all_with(&extractor).await
    }

    /// 使用给定的抽取器处理 `intermediate_dir` 下的所有文本
    ///
    /// 抽取失败的文件也会以失败报告计入汇总。
    pub async fn extract_all_with<E: Extractor + Sync>(
        &self,
        extractor: &E,
    ) -> Result<CheckOutcome> {
        log_startup("题目抽取", self.config.concurrency());

        let dir = &self.config.intermediate_dir;
        let files: Vec<PathBuf> = list_files(dir)
            .await?
            .into_iter()
            .filter(|p| DocumentConverter::is_supported(p))
            .collect();
        if files.is_empty() {
            warn!("⚠️ 中间目录中没有文本文件，请先运行转换");
            return Ok(CheckOutcome {
                reports: Vec::new(),
                summary: SummaryReport::default(),
            });
        }
        log_files_found(dir, &files);

        let answer_key = load_answer_key(&self.config.answers_dirs).await;
        let answer_key = answer_key.as_deref();
        let output_dir = self.config.output_dir.as_path();

        let results: Vec<(PathBuf, Result<FileReport>)> =
            stream::iter(files.into_iter().enumerate())
                .map(|(idx, path)| async move {
                    let result = file_processor::extract_file(
                        extractor, &path, answer_key, output_dir, idx + 1,
                    )
                    .await;
                    (path, result)
                })
                .buffered(self.config.concurrency())
                .collect()
                .await;

        let stats = self.tally("抽取", &results);
        self.finish(&stats);

        let reports: Vec<FileReport> = results
            .into_iter()
            .map(|(path, result)| result.unwrap_or_else(|e| failure_report(&path, &e)))
            .collect();
        let summary = SummaryReport::from_reports(&reports);
        Ok(CheckOutcome { reports, summary })
    }

    /// 先转换再抽取，返回整个流程是否全部成功
    pub async fn run_pipeline(&self, skip_ai: bool, only_ai: bool) -> Result<bool> {
        let mut passed = true;
        if !only_ai {
            let stats = self.convert_all().await?;
            passed &= stats.failed == 0;
        }
        if !skip_ai {
            let outcome = self.extract_all().await?;
            self.record(&render_summary(&outcome.summary));
            passed &= outcome.summary.status.is_pass();
        }
        Ok(passed)
    }

    /// 校验单个 JSON 文件或目录下的所有 JSON 文件
    pub async fn check_path(&self, path: &Path) -> Result<CheckOutcome> {
        let files = if path.is_file() {
            if !has_ext(path, "json") {
                anyhow::bail!("输入文件不是JSON文件: {}", path.display());
            }
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            let files = collect_files_with_ext(path, "json").await?;
            if files.is_empty() {
                anyhow::bail!("文件夹 {} 中没有找到JSON文件", path.display());
            }
            info!("开始检查文件夹: {}，共找到 {} 个JSON文件", path.display(), files.len());
            files
        } else {
            anyhow::bail!("路径不存在: {}", path.display());
        };

        let results = self
            .run_bounded(files, |_, path| async move {
                tokio::task::spawn_blocking(move || validator::validate_file(&path))
                    .await
                    .context("校验任务异常退出")
            })
            .await;

        // 任务本身崩溃时也要在报告里占一个失败位置
        let reports: Vec<FileReport> = results
            .into_iter()
            .map(|(path, result)| result.unwrap_or_else(|e| failure_report(&path, &e)))
            .collect();

        let summary = SummaryReport::from_reports(&reports);
        self.record(&render_summary(&summary));
        Ok(CheckOutcome { reports, summary })
    }

    /// 并发处理文件列表，结果按输入顺序返回
    async fn run_bounded<T, F, Fut>(
        &self,
        files: Vec<PathBuf>,
        task: F,
    ) -> Vec<(PathBuf, Result<T>)>
    where
        T: Send + 'static,
        F: Fn(usize, PathBuf) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency()));
        let mut handles = Vec::with_capacity(files.len());

        for (idx, path) in files.into_iter().enumerate() {
            let file_index = idx + 1;
            let semaphore = semaphore.clone();
            let fut = task(file_index, path.clone());
            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(anyhow::anyhow!("并发控制信号量已关闭: {}", e)),
                };
                fut.await
            });
            handles.push((path, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(anyhow::anyhow!("任务执行失败: {}", e)),
            };
            results.push((path, result));
        }
        results
    }

    /// 统计结果并记录失败原因
    fn tally<T>(&self, action: &str, results: &[(PathBuf, Result<T>)]) -> ProcessingStats {
        let mut stats = ProcessingStats {
            total: results.len(),
            ..Default::default()
        };
        for (path, result) in results {
            match result {
                Ok(_) => stats.success += 1,
                Err(e) => {
                    error!("❌ {}失败 {}: {:#}", action, path.display(), e);
                    stats.failed += 1;
                }
            }
        }
        stats
    }

    fn finish(&self, stats: &ProcessingStats) {
        let log_path = self.log_file.as_deref().unwrap_or("-");
        print_final_stats(stats.success, stats.failed, stats.total, log_path);
        self.record(&format!(
            "成功: {}/{}，失败: {}",
            stats.success, stats.total, stats.failed
        ));
    }

    /// 追加一段文字到运行日志文件
    fn record(&self, text: &str) {
        let Some(path) = &self.log_file else {
            return;
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{}\n", text));
        if let Err(e) = written {
            warn!("写入日志文件失败 {}: {}", path, e);
        }
    }
}

/// 把处理失败转换为该文件的失败报告
fn failure_report(path: &Path, err: &anyhow::Error) -> FileReport {
    let label = path.display().to_string();
    let (kind, description) = match err.downcast_ref::<AppError>() {
        Some(AppError::File { .. }) => (ErrorKind::FileError, format!("{:#}", err)),
        Some(AppError::Extraction { message, .. }) => (ErrorKind::ParseError, message.clone()),
        _ => (ErrorKind::UnexpectedError, format!("意外错误: {:#}", err)),
    };
    FileReport::fatal(label, ValidationError::new(kind, POSITION_NA, description))
}

fn is_answer_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| ANSWER_FILE_NAMES.contains(&n))
        .unwrap_or(false)
}
