use crate::config::HttpClientConfig;
use crate::error::AppError;
use std::time::Duration;
use tracing::debug;

pub struct HttpClient;

impl HttpClient {
    // 创建HTTP客户端
    pub fn create(config: &HttpClientConfig) -> Result<reqwest::Client, AppError> {
        debug!("Creating HTTP client for upstream, config: {:?}", config);

        // 创建客户端构建器
        let mut client_builder = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout));

        // 配置整体请求超时，未设置时不限制，避免截断长时间的流式中继
        if let Some(request_timeout) = config.request_timeout {
            client_builder = client_builder.timeout(Duration::from_secs(request_timeout));
        }

        // 配置TCP keepalive
        if let Some(ref keepalive) = config.keepalive {
            client_builder = client_builder.tcp_keepalive(Duration::from_secs(*keepalive as u64));
        }

        // 配置空闲连接超时
        if let Some(idle_timeout) = config.idle_timeout {
            client_builder = client_builder.pool_idle_timeout(Duration::from_secs(idle_timeout));
        }

        // 配置用户代理
        if let Some(ref agent) = config.agent {
            client_builder = client_builder.user_agent(agent);
        }

        // 创建HTTP客户端
        let client = client_builder.build().map_err(AppError::Http)?;

        Ok(client)
    }
}
