use quiz_chain_solver::config::Config;
use quiz_chain_solver::infrastructure::ChromiumSessions;
use quiz_chain_solver::services::{ContentFetcher, PageFetcher};
use quiz_chain_solver::utils::logging;
use quiz_chain_solver::{ChainOrchestrator, ChainRequest};
use std::path::PathBuf;
use std::sync::Arc;

/// 需要本机安装 Chrome/Chromium 以及可访问的题目页面
///
/// QUIZ_TEST_URL=https://... cargo test test_fetch_real_page -- --ignored --nocapture
#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_fetch_real_page() {
    // 初始化日志
    logging::init(true);

    // 加载配置
    let config = Config::from_env().expect("加载配置失败");
    let url = std::env::var("QUIZ_TEST_URL").expect("需要设置 QUIZ_TEST_URL");

    let sessions = Arc::new(ChromiumSessions::new(
        config.browser_executable.as_deref().map(PathBuf::from),
    ));
    let fetcher = PageFetcher::from_config(sessions, &config);

    let content = fetcher.fetch(&url).await.expect("抓取页面失败");
    println!("{}", content);

    assert!(!content.trim().is_empty(), "页面内容不应为空");
}

/// 跑完整条真实答题链（浏览器 + LLM + 提交）
///
/// QUIZ_TEST_URL=... QUIZ_TEST_EMAIL=... SECRET=... LLM_API_KEY=... \
///     cargo test test_full_chain -- --ignored --nocapture
#[tokio::test]
#[ignore]
async fn test_full_chain() {
    logging::init(true);

    let config = Config::from_env().expect("加载配置失败");
    let url = std::env::var("QUIZ_TEST_URL").expect("需要设置 QUIZ_TEST_URL");
    let identity = std::env::var("QUIZ_TEST_EMAIL").expect("需要设置 QUIZ_TEST_EMAIL");

    let orchestrator = ChainOrchestrator::from_config(&config);
    let report = orchestrator
        .run(ChainRequest::new(identity, config.secret.clone(), url))
        .await;

    println!("{}", serde_json::to_string_pretty(&report).unwrap());
    assert!(report.steps >= 1);
}
