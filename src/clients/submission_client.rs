//! 提交客户端
//!
//! 把答案 POST 给题目里给出的提交地址，并解析出题方的判定
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::SubmissionError;
use crate::models::{SubmissionPayload, SubmissionVerdict};

/// 提交能力
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(
        &self,
        target: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionVerdict, SubmissionError>;
}

/// 基于 reqwest 的提交客户端
#[derive(Clone, Default)]
pub struct HttpSubmissionClient {
    client: reqwest::Client,
}

impl HttpSubmissionClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn classify(target: &str, err: reqwest::Error) -> SubmissionError {
        if err.is_connect() || err.is_timeout() {
            SubmissionError::Unreachable {
                target: target.to_string(),
                source: Box::new(err),
            }
        } else {
            SubmissionError::Transport {
                target: target.to_string(),
                source: Box::new(err),
            }
        }
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionClient {
    async fn submit(
        &self,
        target: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionVerdict, SubmissionError> {
        debug!("提交 Payload: {}", serde_json::to_string(payload).unwrap_or_default());

        let response = self
            .client
            .post(target)
            .json(payload)
            .send()
            .await
            .map_err(|e| Self::classify(target, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("提交地址返回状态码 {} ({})", status, target);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(target, e))?;

        parse_verdict(target, status.as_u16(), &body)
    }
}

/// 把响应体解析为判定；只要是 JSON 就接受，字段缺失视为"没有"
pub fn parse_verdict(
    target: &str,
    status: u16,
    body: &str,
) -> Result<SubmissionVerdict, SubmissionError> {
    let value: JsonValue =
        serde_json::from_str(body).map_err(|_| SubmissionError::InvalidResponse {
            target: target.to_string(),
            status,
            body: body.to_string(),
        })?;

    debug!("提交结果: {}", value);

    Ok(SubmissionVerdict::from_json(&value))
}
