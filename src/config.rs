use crate::error::ConfigError;
use crate::r#const::{http_client_limits, http_headers, relay_defaults, server_defaults};
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::Path, str::FromStr};
use tracing::debug;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

// 配置结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// 自定义验证函数 - 验证Socket地址格式
pub fn validate_socket_addr(addr: &str) -> Result<(), ValidationError> {
    match SocketAddr::from_str(addr) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_socket_addr")),
    }
}

// 自定义验证函数 - 验证URL格式
pub fn validate_url(url_str: &str) -> Result<(), ValidationError> {
    match Url::parse(url_str) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_url")),
    }
}

// 服务器配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
pub struct ServerConfig {
    // HTTP监听地址
    #[validate(custom(function = validate_socket_addr, message = "Invalid server listen address"))]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: server_defaults::DEFAULT_HTTP_LISTEN.to_string(),
        }
    }
}

// 转发配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
pub struct RelayConfig {
    // 二进制格式 DoH 上游地址（GET/POST 均转发到此处）
    #[serde(default = "default_upstream")]
    #[validate(custom(function = validate_url, message = "Invalid upstream URL"))]
    pub upstream: String,
    // JSON 格式 DoH 上游地址
    #[serde(default = "default_json_upstream")]
    #[validate(custom(function = validate_url, message = "Invalid JSON upstream URL"))]
    pub upstream_json: String,
    // 二进制 DoH 媒体类型，入站请求头按字节精确匹配
    #[serde(default = "default_content_type")]
    pub content_type: String,
    // JSON DoH 媒体类型，入站请求头按字节精确匹配
    #[serde(default = "default_json_content_type")]
    pub json_content_type: String,
    // 受限路径前缀（可选），空字符串等同于未设置
    #[serde(default)]
    pub path: Option<String>,
}

fn default_upstream() -> String {
    relay_defaults::DEFAULT_UPSTREAM.to_string()
}

fn default_json_upstream() -> String {
    relay_defaults::DEFAULT_JSON_UPSTREAM.to_string()
}

fn default_content_type() -> String {
    http_headers::content_types::DNS_MESSAGE.to_string()
}

fn default_json_content_type() -> String {
    http_headers::content_types::DNS_JSON.to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            upstream_json: default_json_upstream(),
            content_type: default_content_type(),
            json_content_type: default_json_content_type(),
            path: None,
        }
    }
}

impl RelayConfig {
    // 生效的受限路径前缀，空字符串视为未限制
    pub fn restricted_prefix(&self) -> Option<&str> {
        self.path.as_deref().filter(|prefix| !prefix.is_empty())
    }
}

// HTTP客户端配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
pub struct HttpClientConfig {
    // 连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    // 整体请求超时（秒）（可选，默认不限制以免截断流式中继）
    #[serde(default)]
    pub request_timeout: Option<u64>,
    // 空闲连接超时（秒）（可选）
    #[serde(default)]
    pub idle_timeout: Option<u64>,
    // TCP Keepalive（秒）（可选）
    #[serde(default)]
    pub keepalive: Option<u32>,
    // HTTP用户代理（可选）
    #[serde(default)]
    pub agent: Option<String>,
}

fn default_connect_timeout() -> u64 {
    http_client_limits::DEFAULT_CONNECT_TIMEOUT
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: None,
            idle_timeout: None,
            keepalive: None,
            agent: None,
        }
    }
}

// 应用配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate, Default)]
#[serde(rename_all = "lowercase")]
pub struct Config {
    // 服务器配置
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    // 转发配置（可选，缺省使用默认上游）
    #[serde(default)]
    #[validate(nested)]
    pub relay: RelayConfig,
    // HTTP客户端配置（可选）
    #[serde(default)]
    #[validate(nested)]
    pub http_client: Option<HttpClientConfig>,
}

impl Config {
    // 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        debug!("Loading configuration file: {:?}", path.as_ref());
        let content = fs::read_to_string(path).map_err(ConfigError::LoadError)?;
        let config: Config = serde_yaml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    // 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        // 使用 validator 库进行验证
        if let Err(errors) = Validate::validate(self) {
            return Err(ConfigError::ValidationError(format_validation_errors(
                &errors,
            )));
        }

        // 边界检查无法用派生宏表达的部分
        self.validate_http_client_config()?;

        Ok(())
    }

    // 验证HTTP客户端配置的取值范围
    fn validate_http_client_config(&self) -> ConfigResult<()> {
        let http_client = match &self.http_client {
            Some(config) => config,
            None => return Ok(()),
        };

        if http_client.connect_timeout < http_client_limits::MIN_CONNECT_TIMEOUT
            || http_client.connect_timeout > http_client_limits::MAX_CONNECT_TIMEOUT
        {
            return Err(ConfigError::InvalidHttpClientConfig(format!(
                "connect_timeout must be between {} and {} seconds",
                http_client_limits::MIN_CONNECT_TIMEOUT,
                http_client_limits::MAX_CONNECT_TIMEOUT
            )));
        }

        if let Some(request_timeout) = http_client.request_timeout {
            if request_timeout < http_client_limits::MIN_REQUEST_TIMEOUT
                || request_timeout > http_client_limits::MAX_REQUEST_TIMEOUT
            {
                return Err(ConfigError::InvalidHttpClientConfig(format!(
                    "request_timeout must be between {} and {} seconds",
                    http_client_limits::MIN_REQUEST_TIMEOUT,
                    http_client_limits::MAX_REQUEST_TIMEOUT
                )));
            }
        }

        if let Some(idle_timeout) = http_client.idle_timeout {
            if idle_timeout < http_client_limits::MIN_IDLE_TIMEOUT
                || idle_timeout > http_client_limits::MAX_IDLE_TIMEOUT
            {
                return Err(ConfigError::InvalidHttpClientConfig(format!(
                    "idle_timeout must be between {} and {} seconds",
                    http_client_limits::MIN_IDLE_TIMEOUT,
                    http_client_limits::MAX_IDLE_TIMEOUT
                )));
            }
        }

        if let Some(keepalive) = http_client.keepalive {
            if keepalive < http_client_limits::MIN_KEEPALIVE
                || keepalive > http_client_limits::MAX_KEEPALIVE
            {
                return Err(ConfigError::InvalidHttpClientConfig(format!(
                    "keepalive must be between {} and {} seconds",
                    http_client_limits::MIN_KEEPALIVE,
                    http_client_limits::MAX_KEEPALIVE
                )));
            }
        }

        Ok(())
    }
}

// 将 ValidationErrors 转换为友好的错误信息
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    // 格式化字段错误
    for (field, error_kind) in errors.errors() {
        match error_kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    messages.push(format!("Field '{}': {}", field, message));
                }
            }
            validator::ValidationErrorsKind::Struct(struct_errors) => {
                messages.push(format!(
                    "Struct '{}' validation failed: {}",
                    field,
                    format_validation_errors(struct_errors)
                ));
            }
            validator::ValidationErrorsKind::List(list_errors) => {
                for (index, err) in list_errors {
                    messages.push(format!(
                        "List '{}' at index {}: {}",
                        field,
                        index,
                        format_validation_errors(err)
                    ));
                }
            }
        }
    }

    if messages.is_empty() {
        "Unknown validation error".to_string()
    } else {
        messages.join("\n")
    }
}
