use crate::error::{AppError, AppResult};
use crate::models::ChunkConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// 未指定 `--config` 时尝试读取的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "mist_parser.toml";

/// 程序配置
///
/// 优先级：命令行参数 > 环境变量 > 配置文件 > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 切分配置 ---
    /// 每个切分片段的目标字符数
    pub chunk_size: usize,
    /// 向后查找题号的范围
    pub lookahead_range: usize,
    /// 待切分的大文件目录
    pub input_large_dir: PathBuf,
    /// 切分结果输出目录
    pub split_output_dir: PathBuf,

    // --- 流水线目录 ---
    /// 原始文档目录
    pub input_dir: PathBuf,
    /// 中间文本（Markdown）目录
    pub intermediate_dir: PathBuf,
    /// 最终 JSON 输出目录
    pub output_dir: PathBuf,
    /// 答案文件搜索目录
    pub answers_dirs: Vec<PathBuf>,

    /// 同时处理的文件数量
    pub max_concurrent_files: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,

    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: crate::models::DEFAULT_TARGET_SIZE,
            lookahead_range: crate::models::DEFAULT_LOOKAHEAD_RANGE,
            input_large_dir: PathBuf::from("data/input_large"),
            split_output_dir: PathBuf::from("data/input"),
            input_dir: PathBuf::from("data/input"),
            intermediate_dir: PathBuf::from("data/intermediate"),
            output_dir: PathBuf::from("data/output"),
            answers_dirs: vec![PathBuf::from("data/input"), PathBuf::from("data/answers")],
            max_concurrent_files: 8,
            verbose_logging: false,
            output_log_file: "mist_parser.log".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.deepseek.com/v1".to_string(),
            llm_model_name: "deepseek-chat".to_string(),
            llm_temperature: 0.1,
        }
    }
}

impl Config {
    /// 加载配置文件（可选）并叠加环境变量
    ///
    /// 显式指定的文件必须存在；未指定时只在默认文件存在时读取。
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
        debug!("读取配置文件: {}", path.display());
        Self::from_toml_str(&content)
            .map_err(|e| AppError::Config(format!("无法解析 {}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 仅使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            chunk_size: parse_var(&var, "CHUNK_SIZE").unwrap_or(self.chunk_size),
            lookahead_range: parse_var(&var, "LOOKAHEAD_RANGE").unwrap_or(self.lookahead_range),
            max_concurrent_files: parse_var(&var, "MAX_CONCURRENT_FILES")
                .unwrap_or(self.max_concurrent_files),
            verbose_logging: parse_var(&var, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            output_log_file: var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            answers_dirs: var("ANSWERS_DIRS")
                .map(|v| split_dirs(&v))
                .unwrap_or(self.answers_dirs),
            llm_api_key: var("AI_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: var("AI_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: var("AI_MODEL_NAME").unwrap_or(self.llm_model_name),
            ..self
        }
    }

    /// 切分配置，`chunk_size` 必须大于 0
    pub fn chunk_config(&self) -> AppResult<ChunkConfig> {
        ChunkConfig::try_new(self.chunk_size, self.lookahead_range)
            .ok_or_else(|| AppError::Config("chunk_size 必须大于 0".to_string()))
    }

    /// 并发数至少为 1
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_files.max(1)
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|v| v.trim().parse().ok())
}

/// 解析逗号分隔的目录列表
pub fn split_dirs(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
