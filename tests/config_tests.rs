use dohgate::config::Config;
use std::io::Write;
use tempfile::NamedTempFile;

// 辅助函数：创建临时配置文件
fn create_temp_config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_basic_config_loading() {
    // 创建一个最小有效配置
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstream: "https://cloudflare-dns.com/dns-query"
  upstream_json: "https://cloudflare-dns.com/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(
        result.is_ok(),
        "Failed to load valid config: {:?}",
        result.err()
    );
    let config = result.unwrap();

    // 验证基本配置值
    assert_eq!(config.server.listen, "127.0.0.1:8080");
    assert_eq!(config.relay.upstream, "https://cloudflare-dns.com/dns-query");
    assert_eq!(
        config.relay.upstream_json,
        "https://cloudflare-dns.com/dns-query"
    );

    // 验证默认值
    assert_eq!(config.relay.content_type, "application/dns-message");
    assert_eq!(config.relay.json_content_type, "application/dns-json");
    assert!(config.relay.path.is_none()); // 默认无路径限制
    assert!(config.http_client.is_none()); // 默认为空
}

#[test]
fn test_empty_config_uses_defaults() {
    // 空配置应完全回落到默认值
    let config_content = "{}";

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(result.is_ok(), "Empty config should load: {:?}", result.err());
    let config = result.unwrap();

    assert_eq!(config.server.listen, "127.0.0.1:8080");
    assert_eq!(config.relay.upstream, "https://dns.google/dns-query");
    assert_eq!(config.relay.upstream_json, "https://dns.google/resolve");
    assert!(config.relay.restricted_prefix().is_none());
}

#[test]
fn test_invalid_listen_address() {
    // 非法监听地址
    let config_content = r#"
server:
  listen: "not-an-address"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(result.is_err());
}

#[test]
fn test_invalid_upstream_url() {
    // 非法上游URL
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstream: "not a url"
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(result.is_err());

    // JSON 上游同样校验
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  upstream_json: ""
"#;

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(result.is_err());
}

#[test]
fn test_restricted_path_prefix() {
    // 配置了路径前缀
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  path: "/dns-query"
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.relay.restricted_prefix(), Some("/dns-query"));
}

#[test]
fn test_empty_path_prefix_means_unrestricted() {
    // 空字符串前缀等同于未设置
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  path: ""
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();

    assert!(config.relay.restricted_prefix().is_none());
}

#[test]
fn test_custom_content_types() {
    // 自定义媒体类型原样保留
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
relay:
  content_type: "application/dns-udpwireformat"
  json_content_type: "application/x-javascript"
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.relay.content_type, "application/dns-udpwireformat");
    assert_eq!(config.relay.json_content_type, "application/x-javascript");
}

#[test]
fn test_http_client_config_limits() {
    // connect_timeout 超出下界
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
http_client:
  connect_timeout: 0
"#;

    let file = create_temp_config_file(config_content);
    assert!(Config::from_file(file.path()).is_err());

    // request_timeout 超出上界
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
http_client:
  connect_timeout: 3
  request_timeout: 99999
"#;

    let file = create_temp_config_file(config_content);
    assert!(Config::from_file(file.path()).is_err());

    // keepalive 低于下界
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
http_client:
  connect_timeout: 3
  keepalive: 1
"#;

    let file = create_temp_config_file(config_content);
    assert!(Config::from_file(file.path()).is_err());

    // 合法取值
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
http_client:
  connect_timeout: 5
  request_timeout: 10
  idle_timeout: 30
  keepalive: 30
  agent: "dohgate-test"
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();
    let http_client = config.http_client.unwrap();

    assert_eq!(http_client.connect_timeout, 5);
    assert_eq!(http_client.request_timeout, Some(10));
    assert_eq!(http_client.idle_timeout, Some(30));
    assert_eq!(http_client.keepalive, Some(30));
    assert_eq!(http_client.agent.as_deref(), Some("dohgate-test"));
}

#[test]
fn test_request_timeout_unset_by_default() {
    // 未配置 request_timeout 时不限制整体请求时长
    let config_content = r#"
server:
  listen: "127.0.0.1:8080"
http_client:
  connect_timeout: 3
"#;

    let file = create_temp_config_file(config_content);
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.http_client.unwrap().request_timeout, None);
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("/nonexistent/config.yaml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_yaml() {
    let config_content = "server: [not: valid";

    let file = create_temp_config_file(config_content);
    let result = Config::from_file(file.path());

    assert!(result.is_err());
}
