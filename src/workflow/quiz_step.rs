//! 单步答题流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 抓取页面 → 失败即结束
//! 2. 解析提交地址（可能没有）
//! 3. LLM 生成答案 → 失败即结束，即使有提交地址也不提交
//! 4. 没有提交地址 → 提前结束；否则提交
//! 5. 判定里有下一题地址 → 继续（与对错无关）；没有 → 结束

use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{ReasoningService, SubmissionService};
use crate::error::ChainResult;
use crate::models::{ChainRequest, SubmissionPayload, SubmissionVerdict};
use crate::orchestrator::retry::RetryPolicy;
use crate::services::{parse_submission_target, AnswerGenerator, ContentFetcher};
use crate::utils::truncate_text;
use crate::workflow::chain_ctx::ChainCtx;

/// 单步处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// 判定给出了下一题
    Continue(String),
    /// 判定里没有下一题
    Done,
    /// 题目中没有提交地址
    CutShort,
}

/// 外部协作方
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn ContentFetcher>,
    pub reasoning: Arc<dyn ReasoningService>,
    pub submitter: Arc<dyn SubmissionService>,
}

/// 单步答题流程
///
/// - 编排 抓取 → 解析 → 分析 → 提交
/// - 不持有任何资源（浏览器会话在抓取服务内部开关）
/// - 每次外部调用按重试策略执行
pub struct QuizStep {
    fetcher: Arc<dyn ContentFetcher>,
    generator: AnswerGenerator,
    submitter: Arc<dyn SubmissionService>,
    retry: RetryPolicy,
    verbose_logging: bool,
}

impl QuizStep {
    /// 创建新的答题流程
    pub fn new(collaborators: Collaborators, retry: RetryPolicy) -> Self {
        Self {
            fetcher: collaborators.fetcher,
            generator: AnswerGenerator::new(collaborators.reasoning),
            submitter: collaborators.submitter,
            retry,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    pub async fn run(&self, request: &ChainRequest, ctx: &ChainCtx) -> ChainResult<StepResult> {
        // ========== 抓取 ==========
        info!("{} 🔍 正在抓取题目: {}", ctx, request.url);
        let content = self
            .retry
            .run("页面抓取", || self.fetcher.fetch(&request.url))
            .await?;

        self.log_content(ctx, &content);

        // ========== 解析提交地址 ==========
        let target = parse_submission_target(&content);
        match &target {
            Some(target) => info!("{} ✓ 找到提交地址: {}", ctx, target),
            None => warn!("{} ⚠️ 题目中未找到提交地址", ctx),
        }

        // ========== LLM 分析 ==========
        info!("{} 🤖 使用 LLM 分析题目...", ctx);
        let answer = self
            .retry
            .run("LLM 分析", || self.generator.generate(&content))
            .await?;
        // 题目内容到此为止不再需要
        drop(content);

        // ========== 提交 ==========
        let Some(target) = target else {
            warn!("{} ⚠️ 分析完成，但没有提交地址，答题链提前结束", ctx);
            return Ok(StepResult::CutShort);
        };

        let payload = SubmissionPayload::new(request, answer);
        info!("{} 📤 正在提交答案到: {}", ctx, target);
        let verdict = self
            .retry
            .run("答案提交", || self.submitter.submit(&target, &payload))
            .await?;

        // ========== 判定 ==========
        self.log_verdict(ctx, &verdict);

        Ok(match verdict.url {
            Some(next) => StepResult::Continue(next),
            None => StepResult::Done,
        })
    }

    // ========== 日志辅助方法 ==========

    fn log_verdict(&self, ctx: &ChainCtx, verdict: &SubmissionVerdict) {
        let headline = verdict_headline(verdict.correct, verdict.next_url().is_some());
        match (verdict.correct, verdict.next_url()) {
            (Some(true), Some(next)) => info!("{} {}: {}", ctx, headline, next),
            (Some(true), None) => info!("{} {}", ctx, headline),
            (_, Some(next)) => warn!("{} {}: {}", ctx, headline, next),
            (_, None) => warn!("{} {}", ctx, headline),
        }
        if let Some(reason) = &verdict.reason {
            info!("{} 判定说明: {}", ctx, reason);
        }
    }

    /// 显示题目预览
    fn log_content(&self, ctx: &ChainCtx, content: &str) {
        if self.verbose_logging {
            info!("{} 题目全文:\n{}", ctx, content);
        } else {
            info!("{} 题目: {}", ctx, truncate_text(content, 80));
        }
    }
}

/// 判定摘要；判定里没有 `correct` 时不猜测对错
fn verdict_headline(correct: Option<bool>, has_next: bool) -> &'static str {
    match (correct, has_next) {
        (Some(true), true) => "✅ 回答正确，进入下一题",
        (Some(false), true) => "❌ 回答不正确，跳到下一题",
        (None, true) => "❔ 判定未给出对错，进入下一题",
        (Some(true), false) => "✅ 回答正确，没有下一题",
        (Some(false), false) => "❌ 回答不正确，没有下一题",
        (None, false) => "❔ 判定未给出对错，没有下一题",
    }
}
