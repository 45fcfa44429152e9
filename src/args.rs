use crate::error::AppError;
use crate::r#const::shutdown_timeout;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

// DoH 转发代理服务
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dohgate",
    author,
    version,
    about = "A lightweight DNS-over-HTTPS forwarding proxy\n\n\
             Key Features:\n\
             - Transparent Relay: RFC 8484 (GET/POST) and Google JSON DoH requests forwarded verbatim\n\
             - Streaming Passthrough: POST bodies relayed as live byte streams, never buffered\n\
             - Access Restriction: Optional URL path prefix check before any forwarding\n\
             - Reliability: Reusable HTTP connection pool towards the upstream resolvers\n\
             - Usability: Simple YAML configuration, Configuration validation, Command-line interface"
)]
pub struct Args {
    // 配置文件路径
    #[arg(short, long, default_value = "./config.yaml")]
    pub config: PathBuf,

    // 测试配置
    #[arg(
        short = 't',
        long = "test",
        action = ArgAction::SetTrue,
        help = "Test configuration file for validity and exit"
    )]
    pub test_config: bool,

    // 启用调试日志
    #[arg(
        short = 'd',
        long = "debug",
        action = ArgAction::SetTrue,
        help = "Enable debug level logging for detailed output"
    )]
    pub debug: bool,

    // 关闭超时
    #[arg(
        long = "shutdown-timeout",
        help = "Maximum time in seconds to wait for complete shutdown",
        default_value_t = shutdown_timeout::DEFAULT
    )]
    pub shutdown_timeout: u64,
}

impl Args {
    // 解析命令行参数
    pub fn parse_args() -> Self {
        Args::parse()
    }

    // 验证参数
    pub fn validation(&self) -> Result<(), AppError> {
        if self.shutdown_timeout < shutdown_timeout::MIN
            || self.shutdown_timeout > shutdown_timeout::MAX
        {
            return Err(AppError::InvalidShutdownTimeout);
        }
        Ok(())
    }
}
