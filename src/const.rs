// 应用常量定义

//
// 配置参数限制常量
//

// 应用关闭等待时间限制
pub mod shutdown_timeout {
    // 默认值
    pub const DEFAULT: u64 = 30;
    // 最小值
    pub const MIN: u64 = 1;
    // 最大值
    pub const MAX: u64 = 120;
}

// HTTP客户端配置限制
pub mod http_client_limits {
    // 默认连接超时（秒）
    pub const DEFAULT_CONNECT_TIMEOUT: u64 = 3;
    // 最小连接超时（秒）
    pub const MIN_CONNECT_TIMEOUT: u64 = 1;
    // 最大连接超时（秒）
    pub const MAX_CONNECT_TIMEOUT: u64 = 120;
    // 最小请求超时（秒）
    pub const MIN_REQUEST_TIMEOUT: u64 = 1;
    // 最大请求超时（秒）
    pub const MAX_REQUEST_TIMEOUT: u64 = 1200;
    // 最小空闲超时（秒）
    pub const MIN_IDLE_TIMEOUT: u64 = 5;
    // 最大空闲超时（秒）
    pub const MAX_IDLE_TIMEOUT: u64 = 1800;
    // 最小keepalive时间（秒）
    pub const MIN_KEEPALIVE: u32 = 5;
    // 最大keepalive时间（秒）
    pub const MAX_KEEPALIVE: u32 = 600;
}

//
// 服务与转发默认值
//

// 服务器默认值
pub mod server_defaults {
    // 默认HTTP监听地址
    pub const DEFAULT_HTTP_LISTEN: &str = "127.0.0.1:8080";
}

// 转发目标默认值
pub mod relay_defaults {
    // 默认二进制格式 DoH 上游
    pub const DEFAULT_UPSTREAM: &str = "https://dns.google/dns-query";
    // 默认 JSON 格式 DoH 上游
    pub const DEFAULT_JSON_UPSTREAM: &str = "https://dns.google/resolve";
}

//
// HTTP 协议常量
//

// HTTP头常量
pub mod http_headers {
    // 内容类型常量
    pub mod content_types {
        // DNS消息内容类型
        pub const DNS_MESSAGE: &str = "application/dns-message";
        // DNS JSON内容类型
        pub const DNS_JSON: &str = "application/dns-json";
    }
}

// URL查询参数常量
pub mod query_params {
    // RFC 8484 GET 请求携带 DNS 消息的参数名
    pub const DNS: &str = "dns";
}

// 子系统名称
pub mod subsystem_names {
    // 转发服务器子系统
    pub const RELAY_SERVER: &str = "relay_server";
}
