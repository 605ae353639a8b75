use std::path::{Path, PathBuf};

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::BoxError;

/// 无头浏览器启动参数
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// 浏览器可执行文件，为空时自动查找
    pub executable: Option<PathBuf>,
    /// 独立的用户数据目录，保证会话之间互不影响
    pub user_data_dir: PathBuf,
}

/// 启动无头浏览器
///
/// 返回浏览器句柄和驱动 CDP 事件的后台任务，两者都由调用方负责释放。
pub async fn launch_headless_browser(
    options: &HeadlessOptions,
) -> Result<(Browser, JoinHandle<()>), BoxError> {
    info!("🚀 启动无头浏览器...");
    debug!("用户数据目录: {}", options.user_data_dir.display());

    // 配置无头浏览器
    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .user_data_dir(&options.user_data_dir)
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",              // 容器内运行时没有沙盒权限
            "--disable-dev-shm-usage",   // 防止共享内存不足
            "--remote-debugging-port=0", // 让浏览器自动选择端口
        ]);
    if let Some(executable) = &options.executable {
        builder = builder.chrome_executable(Path::new(executable));
    }
    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        BoxError::from(e)
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BoxError::from(e)
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    Ok((browser, handler_task))
}
