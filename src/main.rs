use dohgate::r#const::subsystem_names;
use dohgate::{AppError, Args, Config, DohForwarder, RelayServer};
use mimalloc::MiMalloc;
use std::process;
use std::sync::Arc;
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};
use tracing::{error, info};

// 使用 mimalloc 分配器提高内存效率
#[global_allocator]
static GLOBAL: MiMalloc = mimalloc::MiMalloc;

fn init_logging(args: &Args) {
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_line_number(false);

    // 如果启用调试模式，输出调试信息，否则只输出 info 及以上级别
    if args.debug {
        builder.with_max_level(tracing::Level::DEBUG)
    } else {
        builder.with_max_level(tracing::Level::INFO)
    }
    .init();
}

// 程序入口
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志
    init_logging(&args);

    // 验证参数
    if let Err(e) = args.validation() {
        error!("Invalid command line arguments: {}", e);
        process::exit(1);
    }

    info!("Starting DoH Gate forwarding proxy");

    // 加载配置
    let config = match Config::from_file(&args.config) {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration file: {}", e);
            process::exit(1);
        }
    };

    // 如果是测试模式，成功验证配置后退出
    if args.test_config {
        info!("Configuration file validation successful");
        return Ok(());
    }

    // 创建应用组件
    let components = match create_components(config) {
        Ok(components) => components,
        Err(e) => {
            error!("Failed to create application components: {}", e);
            process::exit(1);
        }
    };

    // 创建优雅关闭顶层管理器
    let toplevel = Toplevel::new(|s| async move {
        // 启动转发服务器子系统
        let relay_server = components.relay_server;
        s.start(SubsystemBuilder::new(
            subsystem_names::RELAY_SERVER,
            move |s| async move { relay_server.run(s).await },
        ));
    });

    // 等待关闭
    info!("All services started, waiting for requests...");
    match toplevel
        .catch_signals()
        .handle_shutdown_requests(tokio::time::Duration::from_secs(args.shutdown_timeout))
        .await
    {
        Ok(_) => {
            info!("Application gracefully shut down");
            Ok(())
        }
        Err(e) => {
            error!("Application shutdown error: {}", e);
            process::exit(1);
        }
    }
}

// 应用组件
struct AppComponents {
    // 转发服务器
    relay_server: RelayServer,
}

// 创建应用组件
fn create_components(config: Config) -> Result<AppComponents, AppError> {
    // 准备HTTP客户端配置
    let http_client_config = config.http_client.clone().unwrap_or_default();

    // 创建 DoH 转发器
    let forwarder = match DohForwarder::new(&config.relay, &http_client_config) {
        Ok(forwarder) => {
            info!(
                "DoH forwarder initialized, upstream: {}, JSON upstream: {}",
                config.relay.upstream, config.relay.upstream_json
            );
            Arc::new(forwarder)
        }
        Err(e) => {
            error!("Failed to initialize DoH forwarder: {}", e);
            return Err(e);
        }
    };

    // 受限路径前缀（可选）
    let restricted_prefix = config.relay.restricted_prefix().map(str::to_string);
    match &restricted_prefix {
        Some(prefix) => info!("Access restricted to path prefix: {}", prefix),
        None => info!("No path restriction configured, serving all paths"),
    }

    // 创建转发服务器
    let relay_server = RelayServer::new(
        config.server.listen.parse()?,
        forwarder,
        restricted_prefix,
    );

    info!("Relay server initialized with HTTP: {:?}", config.server.listen);

    // 返回应用组件
    Ok(AppComponents { relay_server })
}
