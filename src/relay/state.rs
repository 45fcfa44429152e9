// src/relay/state.rs

use crate::upstream::DohForwarder;
use std::sync::Arc;

/// 应用程序状态结构体
#[derive(Clone)]
pub struct AppState {
    /// DoH 转发器
    pub forwarder: Arc<DohForwarder>,
    /// 受限路径前缀（可选）
    pub restricted_prefix: Option<Arc<str>>,
}
