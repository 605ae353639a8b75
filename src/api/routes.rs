//! HTTP 路由

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use crate::models::ChainRequest;
use crate::orchestrator::ChainOrchestrator;
use crate::utils::logging::log_chain_summary;

/// 开题接口路径
pub const QUIZ_ENDPOINT: &str = "/quiz-api";

/// 共享状态
pub struct AppState {
    /// 与出题方约定的共享密钥
    pub secret: String,
    pub orchestrator: ChainOrchestrator,
}

/// 开题请求；字段缺失由处理函数给出对应的错误码
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StartRequest {
    #[serde(alias = "email")]
    identity: Option<String>,
    secret: Option<String>,
    url: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(QUIZ_ENDPOINT, post(handle_quiz_request))
        .route("/health", get(health))
        .with_state(state)
}

/// 启动 HTTP 服务
pub async fn serve(bind_addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("🌐 服务已启动: http://{}{}", listener.local_addr()?, QUIZ_ENDPOINT);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}

async fn handle_quiz_request(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> (StatusCode, Json<JsonValue>) {
    let Ok(Json(body)) = body else {
        warn!("⚠️ 收到无法解析的请求体");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid JSON or Internal Server Error",
        );
    };

    let secret = body.secret.unwrap_or_default();
    if !secrets_match(&secret, &state.secret) {
        warn!("⚠️ 密钥校验失败");
        return error_response(StatusCode::FORBIDDEN, "Invalid secret");
    }

    let Some(url) = body.url.filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing quiz URL");
    };

    let identity = body.identity.unwrap_or_default();
    let request = ChainRequest::new(identity.clone(), secret, url.clone());

    // 同步跑完整条链再返回
    let report = state.orchestrator.run(request).await;
    log_chain_summary(&identity, &report);

    (
        StatusCode::OK,
        Json(json!({
            "status": "Quiz solving initiated",
            "result_summary": report,
            "task_url": url,
        })),
    )
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<JsonValue>) {
    (status, Json(json!({ "error": message })))
}

/// 比较密钥，耗时与第一个不同字节的位置无关
fn secrets_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
