pub mod args;
pub mod config;
pub mod r#const;
pub mod error;
pub mod relay;
pub mod upstream;

// 重导出常用组件
pub use args::Args;
pub use config::Config;
pub use error::AppError;
pub use relay::RelayServer;
pub use upstream::DohForwarder;
