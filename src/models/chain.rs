//! 答题链数据模型

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ChainError;

/// LLM 给出的答案（任意非 null 的 JSON 值，类型原样保留）
pub type Answer = JsonValue;

/// 一条答题链的起点
///
/// identity / secret 在整条链上保持不变，url 随每一步更新。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRequest {
    #[serde(alias = "email")]
    pub identity: String,
    pub secret: String,
    pub url: String,
}

impl ChainRequest {
    pub fn new(
        identity: impl Into<String>,
        secret: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
            url: url.into(),
        }
    }

    /// 下一题：只替换 url
    pub fn next(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }
}

/// 提交给出题方的数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    #[serde(rename = "email")]
    pub identity: String,
    pub secret: String,
    /// 当前这一步的题目地址
    pub url: String,
    pub answer: Answer,
}

impl SubmissionPayload {
    pub fn new(request: &ChainRequest, answer: Answer) -> Self {
        Self {
            identity: request.identity.clone(),
            secret: request.secret.clone(),
            url: request.url.clone(),
            answer,
        }
    }
}

/// 出题方对一次提交的判定
///
/// 所有字段都可能缺失；缺失或类型不对一律视为"没有"。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionVerdict {
    pub correct: Option<bool>,
    /// 下一题地址，存在即继续
    pub url: Option<String>,
    pub reason: Option<String>,
}

impl SubmissionVerdict {
    pub fn from_json(value: &JsonValue) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            correct: value.get("correct").and_then(|v| v.as_bool()),
            url: text("url"),
            reason: text("reason"),
        }
    }

    pub fn next_url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// 答题链最终结果（只反映最后一步）
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainOutcome {
    /// 判定中没有下一题，链正常结束
    Done,
    /// 分析成功但题目中没有提交地址
    CutShort,
    /// 某一阶段失败
    Failed(ChainError),
}

impl ChainOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, ChainOutcome::Done)
    }

    pub fn is_cut_short(&self) -> bool {
        matches!(self, ChainOutcome::CutShort)
    }

    pub fn error(&self) -> Option<&ChainError> {
        match self {
            ChainOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// 面向调用方的简短描述
    pub fn describe(&self) -> String {
        match self {
            ChainOutcome::Done => "Quiz chain complete or ended".to_string(),
            ChainOutcome::CutShort => {
                "Analysis complete, submission failed (no submit URL found)".to_string()
            }
            ChainOutcome::Failed(e) => e.to_string(),
        }
    }
}

/// 一次完整答题链的报告
#[derive(Debug, Serialize)]
pub struct ChainReport {
    pub outcome: ChainOutcome,
    /// 已开始的步数
    pub steps: usize,
    /// 最后一步的题目地址
    pub last_url: String,
}
