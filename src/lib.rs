//! # Quiz Chain Solver
//!
//! 自动完成"取题 → 算答案 → 提交 → 下一题"的答题链服务
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（浏览器进程、Page），只暴露能力
//! - `ChromiumSessions` - 每次抓取启动一个独立的无头浏览器会话
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，只处理单个题目
//! - `PageFetcher` - 渲染页面并读取题目文本
//! - `parse_submission_target` - 从题目中找提交地址
//! - `AnswerGenerator` - 让 LLM 给出答案
//! - `clients/` - LLM 与提交地址的网络客户端
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `ChainCtx` - 上下文封装（identity + 步数）
//! - `QuizStep` - 流程编排（fetch → parse → LLM → submit）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/chain_orchestrator` - 循环跟随下一题地址，限制链长度
//! - `orchestrator/retry` - 外部调用的重试策略
//!
//! `api/` 是外层的 HTTP 入口，负责密钥校验和返回结果摘要。
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{ChainError, ChainResult, ErrorKind};
pub use models::{ChainOutcome, ChainReport, ChainRequest};
pub use orchestrator::{ChainOrchestrator, RetryPolicy};
pub use workflow::{Collaborators, QuizStep};
