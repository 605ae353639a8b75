//! LLM 客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（如 Gemini, Doubao 等），通过 base url 切换

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat as OpenAiResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ReasoningError;

/// 期望的响应格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    /// 要求服务只返回 JSON 对象
    Json,
}

/// 推理能力：给一段提示词，返回一段文本
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn complete(&self, prompt: &str, format: ResponseFormat)
        -> Result<String, ReasoningError>;
}

/// 基于 OpenAI 兼容接口的推理客户端
pub struct OpenAiReasoningClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl OpenAiReasoningClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn build_messages(
        &self,
        prompt: &str,
    ) -> Result<Vec<ChatCompletionRequestMessage>, ReasoningError> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| ReasoningError::InvalidRequest(Box::new(e)))?;

        Ok(vec![ChatCompletionRequestMessage::User(user_msg)])
    }
}

#[async_trait]
impl ReasoningService for OpenAiReasoningClient {
    async fn complete(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, ReasoningError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let messages = self.build_messages(prompt)?;

        let mut request = CreateChatCompletionRequestArgs::default();
        request
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.2);
        if format == ResponseFormat::Json {
            request.response_format(OpenAiResponseFormat::JsonObject);
        }
        let request = request
            .build()
            .map_err(|e| ReasoningError::InvalidRequest(Box::new(e)))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            ReasoningError::ApiCallFailed {
                model: self.model_name.clone(),
                source: Box::new(e),
            }
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ReasoningError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> OpenAiReasoningClient {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            ..Config::default()
        };
        OpenAiReasoningClient::new(&config)
    }

    #[test]
    fn test_build_messages_single_user_turn() {
        let client = create_test_client();
        let messages = client.build_messages("2+2?").unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::User(_)));
    }

    /// 测试 LLM API 连接性
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_complete_json -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_complete_json() {
        let _ = tracing_subscriber::fmt::try_init();

        let client = create_test_client();
        let response = client
            .complete(
                r#"What is 2+2? Respond only with {"answer": <number>}."#,
                ResponseFormat::Json,
            )
            .await
            .expect("LLM 调用失败");

        println!("LLM 响应: {}", response);
        let value: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(value.get("answer").is_some());
    }
}
