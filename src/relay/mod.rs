// src/relay/mod.rs
//
// 入站 HTTP 转发服务器模块实现，支持:
// - RFC 8484: 标准 DoH 协议，GET（dns 参数）与 POST（请求体）两种形态
// - Google JSON API: JSON 格式的 DoH 请求，仅支持 GET 方法
// - 可选的路径前缀访问限制，未分类的请求一律返回 404

// 子模块定义
pub mod handler;
pub mod server;
pub mod state;

// 公开导出
pub use server::RelayServer;
