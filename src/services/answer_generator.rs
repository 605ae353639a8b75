//! 答案生成服务 - 业务能力层
//!
//! 只负责"读题 → 让 LLM 给出答案 → 解析答案"，不关心流程

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::clients::{ReasoningService, ResponseFormat};
use crate::error::AnalysisError;
use crate::models::Answer;
use crate::utils::logging::truncate_text;

/// 答案生成服务
///
/// 职责：
/// - 构建固定模板的提示词
/// - 要求 LLM 以 JSON 返回
/// - 从响应中取出 `answer`
pub struct AnswerGenerator {
    reasoning: Arc<dyn ReasoningService>,
}

impl AnswerGenerator {
    pub fn new(reasoning: Arc<dyn ReasoningService>) -> Self {
        Self { reasoning }
    }

    /// 根据题目内容生成答案
    pub async fn generate(&self, content: &str) -> Result<Answer, AnalysisError> {
        let prompt = Self::build_prompt(content);
        let response = self.reasoning.complete(&prompt, ResponseFormat::Json).await?;

        debug!("LLM 原始响应: {}", truncate_text(&response, 200));

        let answer = Self::parse_answer(&response)?;
        info!("✓ LLM 给出答案: {}", answer);
        Ok(answer)
    }

    /// 构建提示词
    pub fn build_prompt(content: &str) -> String {
        format!(
            r#"You are an expert data analyst and quiz solver. Your goal is to solve the task provided in the following quiz text.

**Instructions:**
1. Carefully read the "Quiz Content" below, including the question, any data links, and the required JSON payload format for the answer.
2. Analyze the question and determine the single, final answer (which could be a number, string, or boolean).
3. Respond ONLY with a valid JSON object in the following format: {{"answer": "..."}}. Do not include any other text or explanation.

**Quiz Content:**
---
{}
---
"#,
            content
        )
    }

    /// 解析 LLM 响应，取出 `answer` 字段
    ///
    /// 接受被 Markdown 代码块包裹的 JSON；null 或空字符串视为缺失。
    pub fn parse_answer(response: &str) -> Result<Answer, AnalysisError> {
        let body = strip_code_fence(response.trim());

        let value: JsonValue =
            serde_json::from_str(body).map_err(|source| AnalysisError::InvalidJson {
                raw: response.to_string(),
                source,
            })?;

        match value.get("answer") {
            None | Some(JsonValue::Null) => Err(AnalysisError::MissingAnswer {
                raw: response.to_string(),
            }),
            Some(JsonValue::String(s)) if s.trim().is_empty() => {
                Err(AnalysisError::MissingAnswer {
                    raw: response.to_string(),
                })
            }
            Some(answer) => Ok(answer.clone()),
        }
    }
}

/// 去掉 ```json ... ``` 包裹
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // 跳过语言标记所在的第一行
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReasoningError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 固定返回值的假 LLM，同时记录收到的提示词
    struct CannedReasoning {
        reply: Result<String, String>,
        prompts: Mutex<Vec<(String, ResponseFormat)>>,
    }

    #[async_trait]
    impl ReasoningService for CannedReasoning {
        async fn complete(
            &self,
            prompt: &str,
            format: ResponseFormat,
        ) -> Result<String, ReasoningError> {
            self.prompts.lock().unwrap().push((prompt.to_string(), format));
            self.reply.clone().map_err(|e| ReasoningError::ApiCallFailed {
                model: "fake".to_string(),
                source: e.into(),
            })
        }
    }

    #[test]
    fn test_parse_answer_preserves_type() {
        assert_eq!(AnswerGenerator::parse_answer(r#"{"answer": 4}"#).unwrap(), json!(4));
        assert_eq!(
            AnswerGenerator::parse_answer(r#"{"answer": 4.5}"#).unwrap(),
            json!(4.5)
        );
        assert_eq!(
            AnswerGenerator::parse_answer(r#"{"answer": "Paris"}"#).unwrap(),
            json!("Paris")
        );
        assert_eq!(
            AnswerGenerator::parse_answer(r#"{"answer": false}"#).unwrap(),
            json!(false)
        );
        assert_eq!(
            AnswerGenerator::parse_answer(r#"{"answer": "4", "why": "2+2"}"#).unwrap(),
            json!("4")
        );
    }

    #[test]
    fn test_parse_answer_code_fence() {
        let response = "```json\n{\"answer\": 42}\n```";
        assert_eq!(AnswerGenerator::parse_answer(response).unwrap(), json!(42));
    }

    #[test]
    fn test_parse_answer_missing_key() {
        for response in [r#"{"result": 4}"#, r#"{"answer": null}"#, r#"{"answer": "  "}"#, "[4]"] {
            let err = AnswerGenerator::parse_answer(response).unwrap_err();
            assert!(
                matches!(err, AnalysisError::MissingAnswer { ref raw } if raw == response),
                "{response}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_answer_invalid_json() {
        let err = AnswerGenerator::parse_answer("The answer is 4").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidJson { .. }));
        assert_eq!(err.raw_response(), Some("The answer is 4"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_prompt_embeds_content() {
        let prompt = AnswerGenerator::build_prompt("Question: 2+2?");
        assert!(prompt.contains("---\nQuestion: 2+2?\n---"));
        assert!(prompt.contains(r#"{"answer": "..."}"#));
    }

    #[tokio::test]
    async fn test_generate_requests_json() {
        let reasoning = Arc::new(CannedReasoning {
            reply: Ok(r#"{"answer": 4}"#.to_string()),
            prompts: Mutex::new(Vec::new()),
        });
        let generator = AnswerGenerator::new(reasoning.clone());

        let answer = generator.generate("Question: 2+2?").await.unwrap();
        assert_eq!(answer, json!(4));

        let prompts = reasoning.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].1, ResponseFormat::Json);
        assert!(prompts[0].0.contains("Question: 2+2?"));
    }

    #[tokio::test]
    async fn test_generate_service_failure() {
        let generator = AnswerGenerator::new(Arc::new(CannedReasoning {
            reply: Err("503 Service Unavailable".to_string()),
            prompts: Mutex::new(Vec::new()),
        }));

        let err = generator.generate("Question").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Service(_)));
        assert!(err.is_retryable());
    }
}
