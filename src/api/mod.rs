//! API 模块
//!
//! 接收出题方的开题请求：校验密钥后同步跑完整条答题链，再返回结果摘要

pub mod routes;

// 重新导出常用函数
pub use routes::{router, serve, AppState, QUIZ_ENDPOINT};
