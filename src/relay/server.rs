// src/relay/server.rs

use crate::error::AppError;
use crate::relay::handler;
use crate::relay::state::AppState;
use crate::upstream::DohForwarder;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::{error, info};

/// 构建应用路由
///
/// 所有路径与方法统一进入转发处理函数，形态分类与 404 兜底都在其内部完成。
pub fn build_router(forwarder: Arc<DohForwarder>, restricted_prefix: Option<String>) -> Router {
    // 创建应用程序状态
    let app_state = AppState {
        forwarder,
        restricted_prefix: restricted_prefix.map(Arc::from),
    };

    // 创建路由，fallback 承接全部请求
    Router::new()
        .fallback(handler::relay)
        .with_state(app_state)
}

/// 转发服务器结构体
pub struct RelayServer {
    /// 监听地址
    bind_addr: SocketAddr,
    /// DoH 转发器
    forwarder: Arc<DohForwarder>,
    /// 受限路径前缀（可选）
    restricted_prefix: Option<String>,
    /// 关闭信号发送端
    shutdown_tx: oneshot::Sender<()>,
    /// 关闭信号接收端
    shutdown_rx: oneshot::Receiver<()>,
}

impl RelayServer {
    /// 创建新的转发服务器
    pub fn new(
        bind_addr: SocketAddr,
        forwarder: Arc<DohForwarder>,
        restricted_prefix: Option<String>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        Self {
            bind_addr,
            forwarder,
            restricted_prefix,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// 启动转发服务器
    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        // 创建路由
        let app = build_router(self.forwarder, self.restricted_prefix);

        // 创建 TCP 监听器
        let listener = match TcpListener::bind(self.bind_addr).await {
            Ok(listener) => {
                info!("Relay server listening on {}", self.bind_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind relay server: {}", e);
                return Err(AppError::Io(e));
            }
        };

        // 获取关闭信号接收端
        let shutdown_rx = self.shutdown_rx;

        // 启动 HTTP 服务器
        tokio::select! {
            result = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>()
            )
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Relay server received shutdown signal");
            }) => {
                if let Err(e) = result {
                    error!("Relay server error: {}", e);
                } else {
                    info!("Relay server completed normally");
                }
                Ok(())
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Shutdown requested, stopping relay server");
                let _ = self.shutdown_tx.send(());
                Ok(())
            }
        }
    }
}
