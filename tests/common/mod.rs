//! 集成测试共用的辅助函数
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use rust_bidext::bidding::token::{AlphanumericToken, TokenGenerator};
use rust_bidext::config::ConfigManager;
use rust_bidext::logging::RuntimeLogger;
use rust_bidext::AppState;
use uuid::Uuid;

pub const FIREFOX_UA: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:83.0) Gecko/20100101 Firefox/83.0";

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {:?}: {}", path, e))
}

pub fn temp_log_dir() -> String {
    let dir = std::env::temp_dir().join(format!("bidext-it-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.to_string_lossy().into_owned()
}

/// 必须在 tokio 运行时内调用：RuntimeLogger 会启动写日志的后台任务
pub fn state_with(tokens: Arc<dyn TokenGenerator>, config: ConfigManager) -> Arc<AppState> {
    let runtime_logger = RuntimeLogger::new(&config.log_dir, "runtime", 64, 10, 50, 72);
    Arc::new(AppState {
        runtime_logger,
        tokens,
        config: Arc::new(config),
    })
}

pub fn test_state() -> Arc<AppState> {
    let config = ConfigManager {
        log_dir: temp_log_dir(),
        ..ConfigManager::default()
    };
    state_with(Arc::new(AlphanumericToken::from_entropy()), config)
}
