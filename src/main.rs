// src/main.rs

use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use rust_bidext::bidding::token::{AlphanumericToken, TokenGenerator};
use rust_bidext::config::{CliArgs, ConfigManager};
use rust_bidext::logging::{init_tracing, RuntimeLogger};
use rust_bidext::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config = Arc::new(ConfigManager::from_args(&args));

    // 初始化全局 tracing 日志，guard 需要持有到进程退出
    let _guard = init_tracing(&config.log_dir)?;
    info!("Bid extension server starting on {}", config.listen_addr());

    // 初始化运行日志记录器（服务运行状态 + 每个请求的审计日志）
    let runtime_logger = RuntimeLogger::new(
        &config.log_dir,
        "runtime",
        1000,
        100,
        1000,
        config.log_retention_hours,
    );
    runtime_logger.log("INFO", "Bid extension server is starting...").await;

    // 进程级随机源，启动时播种一次
    let tokens: Arc<dyn TokenGenerator> = match config.seed {
        Some(seed) => {
            info!(seed, "Using seeded cb token generator");
            Arc::new(AlphanumericToken::with_seed(seed))
        }
        None => Arc::new(AlphanumericToken::from_entropy()),
    };

    let state = Arc::new(AppState {
        runtime_logger: runtime_logger.clone(),
        tokens,
        config: config.clone(),
    });
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            runtime_logger
                .log("ERROR", &format!("Failed to bind {}: {}", addr, e))
                .await;
            runtime_logger.shutdown().await;
            return Err(e.into());
        }
    };
    runtime_logger
        .log("INFO", &format!("Bid extension server running at http://{}", addr))
        .await;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = &served {
        error!("Server error: {}", e);
    }

    runtime_logger.log("INFO", "Bid extension server shut down.").await;
    runtime_logger.shutdown().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutting down gracefully..."),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
