//! 答题步骤上下文
//!
//! 封装"我正在处理哪条链的第几步"这一信息

use std::fmt::Display;

/// 答题步骤上下文（仅用于日志）
#[derive(Debug, Clone)]
pub struct ChainCtx {
    /// 答题人
    pub identity: String,

    /// 当前步数（从1开始）
    pub step: usize,

    /// 当前题目地址
    pub url: String,
}

impl ChainCtx {
    /// 创建新的步骤上下文
    pub fn new(identity: impl Into<String>, step: usize, url: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            step,
            url: url.into(),
        }
    }
}

impl Display for ChainCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[链 {} 步骤#{}]", self.identity, self.step)
    }
}
