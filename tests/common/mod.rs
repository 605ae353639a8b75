//! 集成测试用的假协作方

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use quiz_chain_solver::clients::{ReasoningService, ResponseFormat, SubmissionService};
use quiz_chain_solver::error::{FetchError, ReasoningError, SubmissionError};
use quiz_chain_solver::models::{SubmissionPayload, SubmissionVerdict};
use quiz_chain_solver::services::ContentFetcher;
use quiz_chain_solver::{ChainOrchestrator, Collaborators, QuizStep, RetryPolicy};

pub const IDENTITY: &str = "student@example.com";
pub const SECRET: &str = "s3cret";

/// 按 url 返回固定题目文本；未知 url 视为导航失败
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn with_page(mut self, url: &str, content: &str) -> Self {
        self.pages.insert(url.to_string(), content.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Navigation {
                url: url.to_string(),
                source: "net::ERR_NAME_NOT_RESOLVED".into(),
            })
    }
}

/// 依次返回预设响应，用完后返回默认响应
pub struct ScriptedReasoning {
    default_reply: String,
    queue: Mutex<VecDeque<Result<String, ReasoningError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedReasoning {
    pub fn always(reply: &str) -> Self {
        Self {
            default_reply: reply.to_string(),
            queue: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn then(self, reply: Result<String, ReasoningError>) -> Self {
        self.queue.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningService for ScriptedReasoning {
    async fn complete(
        &self,
        _prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, ReasoningError> {
        assert_eq!(format, ResponseFormat::Json);
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.queue.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(self.default_reply.clone()),
        }
    }
}

/// 记录每次提交；依次返回预设判定，用完后返回 `{"correct": true}`
#[derive(Default)]
pub struct RecordingSubmitter {
    queue: Mutex<VecDeque<Result<JsonValue, SubmissionError>>>,
    pub attempts: AtomicUsize,
    pub submissions: Mutex<Vec<(String, SubmissionPayload)>>,
}

impl RecordingSubmitter {
    pub fn then_verdict(self, verdict: JsonValue) -> Self {
        self.queue.lock().unwrap().push_back(Ok(verdict));
        self
    }

    pub fn then_error(self, err: SubmissionError) -> Self {
        self.queue.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn submissions(&self) -> Vec<(String, SubmissionPayload)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionService for RecordingSubmitter {
    async fn submit(
        &self,
        target: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionVerdict, SubmissionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let next = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"correct": true})));
        let verdict = next?;
        self.submissions
            .lock()
            .unwrap()
            .push((target.to_string(), payload.clone()));
        Ok(SubmissionVerdict::from_json(&verdict))
    }
}

/// 一组假协作方
pub struct Harness {
    pub fetcher: Arc<dyn ContentFetcher>,
    pub reasoning: Arc<ScriptedReasoning>,
    pub submitter: Arc<RecordingSubmitter>,
}

impl Harness {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        reasoning: ScriptedReasoning,
        submitter: RecordingSubmitter,
    ) -> Self {
        Self {
            fetcher,
            reasoning: Arc::new(reasoning),
            submitter: Arc::new(submitter),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            fetcher: self.fetcher.clone(),
            reasoning: self.reasoning.clone(),
            submitter: self.submitter.clone(),
        }
    }

    /// 不重试的编排器
    pub fn orchestrator(&self, max_chain_length: usize) -> ChainOrchestrator {
        self.orchestrator_with_retry(max_chain_length, RetryPolicy::none())
    }

    pub fn orchestrator_with_retry(
        &self,
        max_chain_length: usize,
        retry: RetryPolicy,
    ) -> ChainOrchestrator {
        ChainOrchestrator::new(QuizStep::new(self.collaborators(), retry), max_chain_length)
    }
}

/// 退避时间极短的重试策略
pub fn fast_retry(max_attempts: usize) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(2),
    }
}
