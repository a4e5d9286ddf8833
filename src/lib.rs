// src/lib.rs

use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::Router;
use std::sync::Arc;

pub mod api;
pub mod bidding;
pub mod config;
pub mod logging;
pub mod model;
pub mod openrtb;

use bidding::token::TokenGenerator;
use config::ConfigManager;
use logging::RuntimeLogger;

#[derive(Clone)]
pub struct AppState {
    pub runtime_logger: Arc<RuntimeLogger>,
    pub tokens: Arc<dyn TokenGenerator>,
    pub config: Arc<ConfigManager>,
}

/// 组装路由。`/bid` 不限制请求方法，非 POST 请求会在请求体校验阶段失败
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/bid", any(api::handle_bid_request))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
