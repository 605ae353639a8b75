//! 错误类型
//!
//! 按答题链的阶段划分：抓取 / 分析 / 提交 / 链长度超限。
//! 调用方通过 [`ChainError::kind`] 分支，而不是匹配字符串。

use std::time::Duration;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// 第三方错误的统一装箱类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 答题链错误
#[derive(Debug, Error)]
pub enum ChainError {
    /// 页面抓取失败
    #[error("抓取失败: {0}")]
    Fetch(#[from] FetchError),
    /// LLM 分析失败
    #[error("LLM 分析失败: {0}")]
    Analysis(#[from] AnalysisError),
    /// 答案提交失败
    #[error("提交失败: {0}")]
    Submission(#[from] SubmissionError),
    /// 答题链达到最大长度，远端仍在给出下一题
    #[error("答题链达到最大长度 {max_steps}，未继续下一题: {next_url}")]
    ChainCapExceeded { max_steps: usize, next_url: String },
}

/// 错误类别（用于分支和序列化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    FetchError,
    AnalysisError,
    SubmissionError,
    ChainCapExceeded,
}

impl ChainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::Fetch(_) => ErrorKind::FetchError,
            ChainError::Analysis(_) => ErrorKind::AnalysisError,
            ChainError::Submission(_) => ErrorKind::SubmissionError,
            ChainError::ChainCapExceeded { .. } => ErrorKind::ChainCapExceeded,
        }
    }
}

impl Serialize for ChainError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChainError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// 页面抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 启动渲染会话失败
    #[error("启动浏览器失败 ({url}): {source}")]
    Launch {
        url: String,
        #[source]
        source: BoxError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BoxError,
    },
    /// 等待内容区域超时（含等待网络空闲的时间）
    #[error("等待元素 {selector} 超时 ({timeout:?}): {url}")]
    SelectorTimeout {
        url: String,
        selector: String,
        timeout: Duration,
    },
    /// 读取内容区域文本失败
    #[error("读取 {url} 的页面内容失败: {source}")]
    Extraction {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Launch { url, .. }
            | FetchError::Navigation { url, .. }
            | FetchError::SelectorTimeout { url, .. }
            | FetchError::Extraction { url, .. } => url,
        }
    }
}

/// LLM 服务调用错误
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// API 调用失败
    #[error("LLM API 调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: BoxError,
    },
    /// 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 请求构建失败
    #[error("构建 LLM 请求失败: {0}")]
    InvalidRequest(#[source] BoxError),
}

impl ReasoningError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ReasoningError::InvalidRequest(_))
    }
}

/// 答案分析错误，保留原始响应便于排查
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Service(#[from] ReasoningError),
    /// 响应不是合法 JSON
    #[error("LLM 响应不是合法 JSON (响应: {raw}): {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    /// 响应中没有 answer 字段
    #[error("LLM 响应中缺少 'answer' 字段 (响应: {raw})")]
    MissingAnswer { raw: String },
}

impl AnalysisError {
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Service(e) => e.is_retryable(),
            AnalysisError::InvalidJson { .. } | AnalysisError::MissingAnswer { .. } => false,
        }
    }

    /// 原始响应（服务调用失败时没有）
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AnalysisError::Service(_) => None,
            AnalysisError::InvalidJson { raw, .. } | AnalysisError::MissingAnswer { raw } => {
                Some(raw)
            }
        }
    }
}

/// 答案提交错误
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// 请求未送达（连接失败或超时）
    #[error("无法连接提交地址 {target}: {source}")]
    Unreachable {
        target: String,
        #[source]
        source: BoxError,
    },
    /// 其他传输错误，请求可能已被对方收到
    #[error("提交请求失败 ({target}): {source}")]
    Transport {
        target: String,
        #[source]
        source: BoxError,
    },
    /// 响应不是 JSON
    #[error("提交响应不是合法 JSON ({target}, 状态码 {status}): {body}")]
    InvalidResponse {
        target: String,
        status: u16,
        body: String,
    },
}

impl SubmissionError {
    /// 只有确定未送达的请求才重试，避免重复提交
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionError::Unreachable { .. })
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== Result 类型别名 ==========

/// 答题链结果类型
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_per_stage() {
        let fetch = ChainError::from(FetchError::SelectorTimeout {
            url: "https://x/q".to_string(),
            selector: "#result".to_string(),
            timeout: Duration::from_secs(15),
        });
        assert_eq!(fetch.kind(), ErrorKind::FetchError);

        let missing = ChainError::from(AnalysisError::MissingAnswer {
            raw: "{}".to_string(),
        });
        assert_eq!(missing.kind(), ErrorKind::AnalysisError);

        let cap = ChainError::ChainCapExceeded {
            max_steps: 3,
            next_url: "https://x/q4".to_string(),
        };
        assert_eq!(cap.kind(), ErrorKind::ChainCapExceeded);
    }

    #[test]
    fn test_stage_errors_retryable() {
        let missing = AnalysisError::MissingAnswer {
            raw: "{}".to_string(),
        };
        assert!(!missing.is_retryable());

        let service = AnalysisError::Service(ReasoningError::EmptyContent {
            model: "m".to_string(),
        });
        assert!(service.is_retryable());

        let bad_request = AnalysisError::Service(ReasoningError::InvalidRequest("bad".into()));
        assert!(!bad_request.is_retryable());

        let transport = SubmissionError::Transport {
            target: "https://x/sub".to_string(),
            source: "reset".into(),
        };
        assert!(!transport.is_retryable());
    }

    #[test]
    fn test_sub_second_timeout_message() {
        let err = FetchError::SelectorTimeout {
            url: "https://x/q".to_string(),
            selector: "#result".to_string(),
            timeout: Duration::from_millis(1500),
        };
        assert!(err.to_string().contains("1.5s"), "{err}");
    }

    #[test]
    fn test_serialize_carries_kind() {
        let err = ChainError::from(SubmissionError::InvalidResponse {
            target: "https://x/sub".to_string(),
            status: 502,
            body: "<html>".to_string(),
        });
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "SubmissionError");
        assert!(value["message"].as_str().unwrap().contains("502"));
    }

    #[test]
    fn test_raw_response_retained() {
        let err = AnalysisError::MissingAnswer {
            raw: r#"{"result": 4}"#.to_string(),
        };
        assert_eq!(err.raw_response(), Some(r#"{"result": 4}"#));
    }
}
