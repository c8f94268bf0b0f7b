//! 题目抽取服务 - 业务能力层
//!
//! 把切分后的文本交给 LLM，换回题目 JSON 列表。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（DeepSeek、Qwen 等）

use crate::config::Config;
use crate::error::{AppError, AppResult};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::future::Future;
use tracing::{debug, warn};

/// 约束 LLM 输出结构的系统提示词
pub const SYSTEM_PROMPT: &str = r#"
你是一个专业的题目文本解析器，负责将非结构化的题目文本转换为标准化的JSON格式。

请严格按照以下JSON结构输出：
[
  {
    "type": "single_choice", // 题型：single_choice, multiple_choice, judge, fill, essay
    "content": "题干文本", // 题干文本，不包含题目序号
    "options": ["选项内容", "选项内容"], // 选择题必填，其他题型为空数组，选项前不加A/B/C/D
    "answer": "A" // 多选则有多个答案，如 ["A", "B"]
  }
]

要求：
0. 对于LaTeX公式中的反斜杠，必须使用双反斜杠转义（例如输出"\\pi"而不是"\pi"），否则JSON解析会失败。
1. 只输出纯JSON字符串，不要包含任何Markdown标记（如```json）
2. 确保JSON格式合法
3. 正确识别题型并提取题干、选项和答案
4. 对于没有明确答案的题目，保持answer字段为空字符串
5. 确保题干前没有题目序号，例如"1. 这是一个单选题？"应解析为"这是一个单选题？"
"#;

/// 文本 -> 题目 JSON 的抽取能力
pub trait Extractor {
    /// 返回 LLM 的原始响应文本
    fn extract(&self, user_message: &str) -> impl Future<Output = AppResult<String>> + Send;
}

/// 基于 OpenAI 兼容接口的抽取器
pub struct LlmExtractor {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
}

impl LlmExtractor {
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.llm_api_key.trim().is_empty() {
            return Err(AppError::Config(
                "请在环境变量或配置文件中设置 AI_API_KEY".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn send(&self, user_message: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let llm_err = |e: async_openai::error::OpenAIError| AppError::llm(&self.model_name, e);

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()
            .map_err(llm_err)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(llm_err)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(self.temperature)
            .build()
            .map_err(llm_err)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            llm_err(e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::llm(&self.model_name, "LLM 返回内容为空"))?;

        debug!("收到AI响应，长度: {} 字符", content.chars().count());
        Ok(content.trim().to_string())
    }
}

impl Extractor for LlmExtractor {
    fn extract(&self, user_message: &str) -> impl Future<Output = AppResult<String>> + Send {
        self.send(user_message)
    }
}

/// 构建发给 LLM 的用户消息，有参考答案时追加答案区
pub fn build_user_message(chunk_text: &str, answer_key: Option<&str>) -> String {
    match answer_key {
        Some(answers) if !answers.trim().is_empty() => format!(
            "{}\n\n========== 参考答案区 ==========\n以下是整套试卷的参考答案，请根据题号，将上述题目中缺失的答案补充完整：\n{}\n=============================",
            chunk_text, answers
        ),
        _ => chunk_text.to_string(),
    }
}

/// 去掉 LLM 响应外层可能出现的 Markdown 代码块标记
pub fn clean_response(raw: &str) -> &str {
    let mut text = raw.trim();
    for fence in ["```json", "```JSON", "```"] {
        if let Some(rest) = text.strip_prefix(fence) {
            text = rest;
            break;
        }
    }
    text.strip_suffix("```").unwrap_or(text).trim()
}
