// src/upstream/forward.rs

use crate::config::{HttpClientConfig, RelayConfig};
use crate::error::{AppError, ConfigError};
use crate::r#const::query_params;
use crate::upstream::http_client::HttpClient;
use axum::{
    body::Body,
    http::{header, HeaderName},
    response::Response,
};
use tracing::debug;
use url::Url;

// 逐跳头部，由代理自身的连接管理，不随响应透传
const HOP_BY_HOP_HEADERS: [HeaderName; 7] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
];

/// DoH 转发器
///
/// 持有共享的 HTTP 客户端与解析后的上游地址，对三种入站形态各发起一次
/// 对应的出站请求，并把上游响应原样透传（状态码、头部、流式响应体）。
/// 不做重试、不做缓存、不解析 DNS 报文。
pub struct DohForwarder {
    /// 共享HTTP客户端（连接池复用）
    client: reqwest::Client,
    /// 二进制格式 DoH 上游地址
    upstream: Url,
    /// JSON 格式 DoH 上游地址
    upstream_json: Url,
    /// 二进制 DoH 媒体类型
    content_type: String,
    /// JSON DoH 媒体类型
    json_content_type: String,
}

impl DohForwarder {
    /// 创建新的 DoH 转发器
    pub fn new(relay: &RelayConfig, http_client: &HttpClientConfig) -> Result<Self, AppError> {
        let upstream = Url::parse(&relay.upstream)
            .map_err(|e| ConfigError::InvalidUpstreamUrl(format!("{}: {}", relay.upstream, e)))?;
        let upstream_json = Url::parse(&relay.upstream_json).map_err(|e| {
            ConfigError::InvalidUpstreamUrl(format!("{}: {}", relay.upstream_json, e))
        })?;

        let client = HttpClient::create(http_client)?;

        Ok(Self {
            client,
            upstream,
            upstream_json,
            content_type: relay.content_type.clone(),
            json_content_type: relay.json_content_type.clone(),
        })
    }

    // 入站头部匹配时使用的媒体类型
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn json_content_type(&self) -> &str {
        &self.json_content_type
    }

    /// 转发 RFC 8484 GET 请求
    ///
    /// 入站的 `dns` 参数值原样附加到上游地址上，参数值为空同样转发。
    pub async fn forward_get(&self, dns: &str) -> Result<Response, AppError> {
        let mut url = self.upstream.clone();
        url.query_pairs_mut().append_pair(query_params::DNS, dns);

        debug!("Forwarding DoH GET request to {}", url);

        let upstream_response = self
            .client
            .get(url)
            .header(header::ACCEPT, &self.content_type)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("DoH GET request failed: {}", e)))?;

        Ok(passthrough_response(upstream_response))
    }

    /// 转发 RFC 8484 POST 请求
    ///
    /// 入站请求体以字节流形式直接接到出站请求上，不整体缓冲，
    /// 客户端与上游之间的背压和字节顺序由流本身保持。
    pub async fn forward_post(&self, body: Body) -> Result<Response, AppError> {
        debug!("Forwarding DoH POST request to {}", self.upstream);

        let upstream_response = self
            .client
            .post(self.upstream.clone())
            .header(header::ACCEPT, &self.content_type)
            .header(header::CONTENT_TYPE, &self.content_type)
            .body(reqwest::Body::wrap_stream(body.into_data_stream()))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("DoH POST request failed: {}", e)))?;

        Ok(passthrough_response(upstream_response))
    }

    /// 转发 Google JSON 格式的 GET 请求
    ///
    /// 入站请求的完整原始查询串附加到 JSON 上游地址上。
    pub async fn forward_json(&self, raw_query: Option<&str>) -> Result<Response, AppError> {
        let mut url = self.upstream_json.clone();
        url.set_query(raw_query);

        debug!("Forwarding JSON DoH request to {}", url);

        let upstream_response = self
            .client
            .get(url)
            .header(header::ACCEPT, &self.json_content_type)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON DoH request failed: {}", e)))?;

        Ok(passthrough_response(upstream_response))
    }
}

// 将上游响应原样转换为出站响应，响应体保持流式透传
fn passthrough_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in upstream_headers.iter() {
        if !HOP_BY_HOP_HEADERS.contains(name) && name.as_str() != "keep-alive" {
            headers.append(name, value.clone());
        }
    }

    response
}
