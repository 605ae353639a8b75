//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `chain_orchestrator` - 答题链编排器
//! - 从起始 url 循环执行单步流程
//! - 跟随判定中的下一题地址
//! - 限制最大链长度
//! - 汇总最后一步的结果
//!
//! ### `retry` - 重试策略
//! - 指数退避
//! - 区分可重试（网络 / 超时）和不可重试（格式错误）
//!
//! ## 层次关系
//!
//! ```text
//! chain_orchestrator (处理一条链)
//!     ↓
//! workflow::QuizStep (处理单个题目)
//!     ↓
//! services / clients (能力层：抓取 / 解析 / LLM / 提交)
//!     ↓
//! infrastructure (基础设施：渲染会话)
//! ```

pub mod chain_orchestrator;
pub mod retry;

// 重新导出主要类型
pub use chain_orchestrator::ChainOrchestrator;
pub use retry::{RetryPolicy, Retryable};
