// src/upstream/mod.rs
//
// 上游 DoH 客户端模块实现，负责出站转发:
// - http_client: 基于配置构建共享的 reqwest 客户端
// - forward: 三种 DoH 形态（RFC 8484 GET/POST、Google JSON GET）的透明转发

// 子模块定义
pub mod forward;
pub mod http_client;

// 公开导出
pub use forward::DohForwarder;
