// src/model/context.rs

use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::HeaderMap;
use std::time::Instant;
use uuid::Uuid;

/// 单次请求的上下文，仅在一次请求/响应周期内存在
#[derive(Debug, Clone)]
pub struct BidContext {
    /// 日志关联用的追踪 ID
    pub trace_id: Uuid,
    pub user_agent: String,
    /// 请求声明的 Content-Type（原样，仅用于日志）
    pub content_type: Option<String>,
    /// 请求开始时间，用于计算总耗时
    pub start_time: Instant,
}

impl BidContext {
    pub fn new(headers: &HeaderMap) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            user_agent: user_agent(headers),
            content_type: headers
                .get(CONTENT_TYPE)
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned()),
            start_time: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }
}

/// 读取 User-Agent，缺失时为空字符串；非 UTF-8 字节按 lossy 方式解码
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_user_agent_is_empty() {
        assert_eq!(user_agent(&HeaderMap::new()), "");
    }

    #[test]
    fn context_captures_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let context = BidContext::new(&headers);
        assert_eq!(context.user_agent, "Mozilla/5.0");
        assert_eq!(context.content_type.as_deref(), Some("text/plain"));
    }
}
