// src/relay/handler.rs

use crate::r#const::query_params;
use crate::relay::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};
use url::form_urlencoded;

/// 统一入口：对任意方法、任意路径的入站请求做形态分类并转发
///
/// 分类规则按固定顺序求值，首个命中者生效:
/// 1. GET 且查询串携带 `dns` 参数 → 转发到二进制 DoH 上游
/// 2. POST 且 `Content-Type` 与配置的媒体类型逐字节相等 → 请求体流式转发
/// 3. GET 且 `Accept` 与配置的 JSON 媒体类型逐字节相等 → 携带完整查询串转发
/// 4. 其余请求 → 404，空响应体，不发起任何出站调用
///
/// 路径限制先于分类：配置了受限前缀时，路径不匹配的请求直接 404。
pub async fn relay(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    // 路径限制检查，独立于方法与形态分类
    if let Some(prefix) = state.restricted_prefix.as_deref() {
        if !parts.uri.path().starts_with(prefix) {
            debug!(
                "Request path {} outside restricted prefix, denied",
                parts.uri.path()
            );
            return not_found();
        }
    }

    let forwarder = &state.forwarder;

    let result = if parts.method == Method::GET {
        if let Some(dns) = dns_param(parts.uri.query()) {
            // 参数存在即转发，空值同样视为存在
            forwarder.forward_get(&dns).await
        } else if header_matches(&parts.headers, header::ACCEPT, forwarder.json_content_type()) {
            forwarder.forward_json(parts.uri.query()).await
        } else {
            debug!("Unclassified GET request, returning 404");
            return not_found();
        }
    } else if parts.method == Method::POST
        && header_matches(&parts.headers, header::CONTENT_TYPE, forwarder.content_type())
    {
        forwarder.forward_post(body).await
    } else {
        debug!(
            "Unclassified {} request, returning 404",
            parts.method
        );
        return not_found();
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to forward request upstream: {}", e);
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

// 固定的 404 响应（空响应体）
fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

// 提取查询串中的 dns 参数值，参数缺失返回 None
fn dns_param(raw_query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(raw_query?.as_bytes())
        .find(|(name, _)| name == query_params::DNS)
        .map(|(_, value)| value.into_owned())
}

// 头部按字节精确比较，带参数的媒体类型（如 "; charset=utf-8"）不匹配
fn header_matches(headers: &HeaderMap, name: HeaderName, expected: &str) -> bool {
    headers
        .get(name)
        .is_some_and(|value| value.as_bytes() == expected.as_bytes())
}
