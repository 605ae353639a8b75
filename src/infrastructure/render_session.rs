//! 渲染会话 - 基础设施层
//!
//! 持有稀缺资源（浏览器进程 + Page），只暴露"打开页面 / 读取元素文本 / 关闭"能力

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser::{launch_headless_browser, HeadlessOptions};
use crate::error::BoxError;

/// 一次独立的渲染会话
///
/// 调用方必须在所有退出路径上调用 [`RenderSession::close`]。
#[async_trait]
pub trait RenderSession: Send {
    /// 导航到 url，等待页面加载完成且网络空闲
    ///
    /// 不自带时限，由调用方统一限时。
    async fn navigate(&mut self, url: &str) -> Result<(), BoxError>;

    /// 读取元素文本；元素尚未出现时返回 `Ok(None)`
    ///
    /// 元素存在但脚本还没填充内容时会返回空文本。
    async fn element_text(&mut self, selector: &str) -> Result<Option<String>, BoxError>;

    /// 释放会话持有的全部资源
    async fn close(self: Box<Self>);
}

/// 渲染会话工厂
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RenderSession>, BoxError>;
}

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 基于 chromiumoxide 的会话工厂：每个会话启动一个独立的无头浏览器
#[derive(Debug, Clone, Default)]
pub struct ChromiumSessions {
    executable: Option<PathBuf>,
}

impl ChromiumSessions {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn next_profile_dir() -> PathBuf {
        let seq = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("quiz-chain-{}-{}", std::process::id(), seq))
    }
}

#[async_trait]
impl SessionProvider for ChromiumSessions {
    async fn open(&self) -> Result<Box<dyn RenderSession>, BoxError> {
        let options = HeadlessOptions {
            executable: self.executable.clone(),
            user_data_dir: Self::next_profile_dir(),
        };
        let (browser, handler) = launch_headless_browser(&options).await?;
        Ok(Box::new(ChromiumSession {
            browser,
            handler,
            page: None,
            profile_dir: options.user_data_dir,
        }))
    }
}

/// 单个浏览器进程及其页面
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    profile_dir: PathBuf,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), BoxError> {
        let page = self.browser.new_page("about:blank").await?;
        // 先保存，失败时也能在 close 中关闭
        self.page = Some(page.clone());

        // 在导航前订阅，避免错过 networkIdle
        page.execute(SetLifecycleEventsEnabledParams::new(true)).await?;
        let mut lifecycle = page.event_listener::<EventLifecycleEvent>().await?;

        page.goto(url).await?;
        debug!("页面加载完成，等待网络空闲: {}", url);

        let main_frame = page.mainframe().await?;
        let mut loader_id = None;
        while let Some(event) = lifecycle.next().await {
            if Some(&event.frame_id) != main_frame.as_ref() {
                continue;
            }
            match event.name.as_str() {
                // 本次导航的文档
                "init" => loader_id = Some(event.loader_id.clone()),
                "networkIdle" if loader_id.as_ref() == Some(&event.loader_id) => {
                    debug!("网络已空闲: {}", url);
                    return Ok(());
                }
                _ => {}
            }
        }
        Err("页面生命周期事件流已关闭".into())
    }

    async fn element_text(&mut self, selector: &str) -> Result<Option<String>, BoxError> {
        let Some(page) = &self.page else {
            return Err("页面尚未打开".into());
        };
        // 找不到元素说明页面脚本还没渲染完，交给调用方继续等
        let element = match page.find_element(selector).await {
            Ok(element) => element,
            Err(_) => return Ok(None),
        };
        let text = element.inner_text().await?;
        Ok(Some(text.unwrap_or_default()))
    }

    async fn close(mut self: Box<Self>) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("关闭页面失败: {}", e);
            }
        }
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("等待浏览器进程退出失败: {}", e);
        }
        self.handler.abort();
        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            debug!("清理用户数据目录失败 ({}): {}", self.profile_dir.display(), e);
        }
        debug!("浏览器会话已释放");
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // close 未被调用（例如 future 被取消）时，至少停止事件任务；
        // 浏览器进程由 chromiumoxide 的 Drop 负责终止
        self.handler.abort();
    }
}
