use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::orchestrator::ChainOrchestrator;
use crate::utils::logging::log_startup;

/// 应用主结构
pub struct App {
    config: Config,
    state: Arc<AppState>,
}

impl App {
    /// 初始化应用：组装协作方，不启动任何浏览器
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        log_startup(&config);

        let state = Arc::new(AppState {
            secret: config.secret.clone(),
            orchestrator: ChainOrchestrator::from_config(&config),
        });

        Ok(Self { config, state })
    }

    /// 运行应用主逻辑：启动 HTTP 服务直到进程退出
    pub async fn run(self) -> Result<()> {
        info!("📡 等待开题请求...");
        api::serve(&self.config.bind_addr, self.state).await
    }
}
