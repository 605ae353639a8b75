//! 答题链编排器 - 编排层
//!
//! ## 职责
//!
//! 从起始 url 开始一步一步答题，直到远端不再给出下一题、某一步失败，
//! 或者达到最大链长度。
//!
//! ## 设计特点
//!
//! - **显式循环**：用步数计数代替递归，链长度有上限
//! - **只带必要状态**：步与步之间只传 identity / secret / 当前 url
//! - **只报最后一步**：中间成功的步骤不单独返回

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::{
    HttpSubmissionClient, OpenAiReasoningClient, ReasoningService, SubmissionService,
};
use crate::config::Config;
use crate::error::ChainError;
use crate::infrastructure::ChromiumSessions;
use crate::models::{ChainOutcome, ChainReport, ChainRequest};
use crate::orchestrator::retry::RetryPolicy;
use crate::services::{ContentFetcher, PageFetcher};
use crate::workflow::{ChainCtx, Collaborators, QuizStep, StepResult};

/// 答题链编排器
pub struct ChainOrchestrator {
    step: QuizStep,
    max_chain_length: usize,
}

impl ChainOrchestrator {
    pub fn new(step: QuizStep, max_chain_length: usize) -> Self {
        Self {
            step,
            max_chain_length: max_chain_length.max(1),
        }
    }

    /// 用给定的协作方和配置组装编排器
    pub fn with_collaborators(collaborators: Collaborators, config: &Config) -> Self {
        let step = QuizStep::new(collaborators, RetryPolicy::from_config(config))
            .with_verbose_logging(config.verbose_logging);
        Self::new(step, config.max_chain_length)
    }

    /// 生产环境组装：chromiumoxide 抓取 + OpenAI 兼容 LLM + reqwest 提交
    pub fn from_config(config: &Config) -> Self {
        let sessions = Arc::new(ChromiumSessions::new(
            config.browser_executable.as_deref().map(PathBuf::from),
        ));
        let fetcher: Arc<dyn ContentFetcher> =
            Arc::new(PageFetcher::from_config(sessions, config));
        let reasoning: Arc<dyn ReasoningService> = Arc::new(OpenAiReasoningClient::new(config));
        let submitter: Arc<dyn SubmissionService> = Arc::new(HttpSubmissionClient::new());

        Self::with_collaborators(
            Collaborators {
                fetcher,
                reasoning,
                submitter,
            },
            config,
        )
    }

    /// 运行整条答题链，返回最后一步的结果
    pub async fn run(&self, request: ChainRequest) -> ChainReport {
        info!("🔗 开始答题链: {} (起点: {})", request.identity, request.url);

        let mut current = request;
        let mut steps = 0;

        loop {
            steps += 1;
            let ctx = ChainCtx::new(current.identity.as_str(), steps, current.url.as_str());

            let outcome = match self.step.run(&current, &ctx).await {
                Ok(StepResult::Continue(next_url)) => {
                    if steps >= self.max_chain_length {
                        warn!(
                            "{} ⚠️ 已达到最大链长度 {}，不再继续: {}",
                            ctx, self.max_chain_length, next_url
                        );
                        ChainOutcome::Failed(ChainError::ChainCapExceeded {
                            max_steps: self.max_chain_length,
                            next_url,
                        })
                    } else {
                        current = current.next(next_url);
                        continue;
                    }
                }
                Ok(StepResult::Done) => ChainOutcome::Done,
                Ok(StepResult::CutShort) => ChainOutcome::CutShort,
                Err(e) => {
                    error!("{} ❌ 答题链中止: {}", ctx, e);
                    ChainOutcome::Failed(e)
                }
            };

            return ChainReport {
                outcome,
                steps,
                last_url: current.url,
            };
        }
    }
}
