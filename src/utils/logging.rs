/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{ChainOutcome, ChainReport};

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时 verbose 为 debug，否则为 info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 答题链服务 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 监听地址: {}", config.bind_addr);
    info!("🤖 LLM 模型: {}", config.llm_model_name);
    info!("🔗 最大链长度: {}", config.max_chain_length);
    info!("🔁 单次调用最多尝试: {} 次", config.retry_max_attempts);
    info!("{}", "=".repeat(60));
}

/// 打印一条答题链的最终结果
pub fn log_chain_summary(identity: &str, report: &ChainReport) {
    info!("\n{}", "─".repeat(60));
    info!("📊 答题链结束 [{}]", identity);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("步数: {} | 最后一题: {}", report.steps, report.last_url);
    match &report.outcome {
        ChainOutcome::Done => info!("✅ {}", report.outcome.describe()),
        ChainOutcome::CutShort => warn!("⚠️ {}", report.outcome.describe()),
        ChainOutcome::Failed(_) => warn!("❌ {}", report.outcome.describe()),
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
