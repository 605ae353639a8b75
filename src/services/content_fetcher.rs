//! 题目抓取服务 - 业务能力层
//!
//! 只负责"把 url 渲染出来并读出题目文本"，不关心流程

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::infrastructure::{RenderSession, SessionProvider};

/// 抓取能力
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// 页面抓取器
///
/// 职责：
/// - 每次调用打开一个独立会话
/// - 有限时间内等待内容元素出现
/// - 无论成功失败都关闭会话
pub struct PageFetcher {
    sessions: Arc<dyn SessionProvider>,
    selector: String,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl PageFetcher {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        selector: impl Into<String>,
        wait_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            selector: selector.into(),
            wait_timeout,
            poll_interval: Duration::from_millis(200),
        }
    }

    pub fn from_config(sessions: Arc<dyn SessionProvider>, config: &Config) -> Self {
        Self::new(
            sessions,
            config.content_selector.clone(),
            Duration::from_secs(config.selector_timeout_secs),
        )
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// 在已打开的会话中完成导航和读取
    ///
    /// 导航（含等待网络空闲）和等待元素共用同一个时限。
    /// 元素存在但文本为空时视为尚未渲染，继续等待。
    async fn render(
        &self,
        session: &mut dyn RenderSession,
        url: &str,
    ) -> Result<String, FetchError> {
        let waited = timeout(self.wait_timeout, async {
            if let Err(source) = session.navigate(url).await {
                return Err(FetchError::Navigation {
                    url: url.to_string(),
                    source,
                });
            }

            loop {
                match session.element_text(&self.selector).await {
                    Ok(Some(text)) if !text.trim().is_empty() => return Ok(text),
                    Ok(_) => sleep(self.poll_interval).await,
                    Err(source) => {
                        return Err(FetchError::Extraction {
                            url: url.to_string(),
                            source,
                        })
                    }
                }
            }
        })
        .await;

        match waited {
            Ok(result) => result,
            Err(_) => Err(FetchError::SelectorTimeout {
                url: url.to_string(),
                selector: self.selector.clone(),
                timeout: self.wait_timeout,
            }),
        }
    }
}

#[async_trait]
impl ContentFetcher for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("抓取页面: {} (元素: {})", url, self.selector);

        let mut session = self
            .sessions
            .open()
            .await
            .map_err(|source| FetchError::Launch {
                url: url.to_string(),
                source,
            })?;

        let result = self.render(session.as_mut(), url).await;
        session.close().await;

        match &result {
            Ok(text) => info!("✓ 页面抓取完成，内容 {} 字符", text.chars().count()),
            Err(e) => warn!("⚠️ 页面抓取失败: {}", e),
        }
        result
    }
}
